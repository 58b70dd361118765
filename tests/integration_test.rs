use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use love_store::project::ProjectService;
use love_store::quiz::{Answer, QuizSession};
use love_store::share::ShareService;
use love_store::sqlite::SqliteStore;
use love_store::terminal::{Reply, Terminal};
use love_store::voice::VoiceGate;
use love_store::wrapped::days_together;
use love_store::{AnalyticsItem, ContentStore, QuizQuestion, ShareStore, TerminalCommand};
use share_code::{ShareCodeConfig, compute_digest};
use tempfile::TempDir;
use uuid::Uuid;

struct Fixture {
    _dir: TempDir,
    store: Arc<SqliteStore>,
    project_id: Uuid,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::open(dir.path().join("love.db")).unwrap());
    let project = ProjectService::new(Arc::clone(&store))
        .create_project(Uuid::now_v7(), "Sam")
        .await
        .unwrap();
    Fixture {
        _dir: dir,
        store,
        project_id: project.id,
    }
}

#[tokio::test]
async fn test_issue_then_redeem_round_trip() {
    let fx = fixture().await;
    let shares = ShareService::new(Arc::clone(&fx.store), ShareCodeConfig::default());

    let code = shares.issue(fx.project_id).await.unwrap();
    assert_eq!(code.len(), 8);

    assert_eq!(
        shares.redeem(code.as_str()).await.unwrap(),
        Some(fx.project_id)
    );
    let sloppy = format!("  {}\n", code.as_str().to_lowercase());
    assert_eq!(shares.redeem(&sloppy).await.unwrap(), Some(fx.project_id));
}

#[tokio::test]
async fn test_only_digest_is_persisted() {
    let fx = fixture().await;
    let shares = ShareService::new(Arc::clone(&fx.store), ShareCodeConfig::default());

    let code = shares.issue(fx.project_id).await.unwrap();
    let digest = compute_digest(code.as_str());
    let record = fx.store.find_share(&digest).await.unwrap().unwrap();

    assert_eq!(record.project_id, fx.project_id);
    assert_eq!(record.digest.as_str().len(), 64);
    assert_ne!(record.digest.as_str(), code.as_str());

    // The raw database file never contains the plaintext code.
    let bytes = std::fs::read(fx.store.path()).unwrap();
    let needle = code.as_str().as_bytes();
    assert!(!bytes.windows(needle.len()).any(|window| window == needle));
}

#[tokio::test]
async fn test_unknown_code_and_multiple_codes() {
    let fx = fixture().await;
    let shares = ShareService::new(Arc::clone(&fx.store), ShareCodeConfig::default());

    assert_eq!(shares.redeem("ZZZZZZZZ").await.unwrap(), None);

    let first = shares.issue(fx.project_id).await.unwrap();
    let second = shares.issue(fx.project_id).await.unwrap();
    assert_ne!(first, second);
    assert_eq!(shares.redeem(first.as_str()).await.unwrap(), Some(fx.project_id));
    assert_eq!(shares.redeem(second.as_str()).await.unwrap(), Some(fx.project_id));
}

#[tokio::test]
async fn test_unlock_bundle_drives_mini_apps() {
    let fx = fixture().await;
    let projects = ProjectService::new(Arc::clone(&fx.store));
    let project_id = fx.project_id;

    projects
        .update_project(project_id, |project| {
            project.voice_word = "Forever".to_string();
            project.voice_file_path = Some("voice.webm".to_string());
        })
        .await
        .unwrap();
    projects
        .save_quiz(
            project_id,
            vec![QuizQuestion::new(
                project_id,
                1,
                "Where did we meet?",
                ["Library", "Beach", "Concert", "School"],
                3,
            )],
        )
        .await
        .unwrap();
    projects
        .save_terminal(
            project_id,
            vec![TerminalCommand::new(project_id, "Miss You", "Counting the days.", 0)],
        )
        .await
        .unwrap();
    projects
        .save_analytics(
            project_id,
            vec![AnalyticsItem::new(project_id, "Days together", "1024", 0)],
        )
        .await
        .unwrap();

    let shares = ShareService::new(Arc::clone(&fx.store), ShareCodeConfig::default());
    let code = shares.issue(project_id).await.unwrap();
    let shared = shares.unlock(code.as_str()).await.unwrap().unwrap();

    assert_eq!(shared.project.partner_name, "Sam");
    assert!(shared.requires_voice_unlock());
    assert!(VoiceGate::new(&shared.project.voice_word).matches("I will love you forever"));

    let terminal = Terminal::from_commands(&shared.terminal);
    assert_eq!(
        terminal.respond("missyou"),
        Reply::Output("Counting the days.".to_string())
    );

    let mut quiz = QuizSession::new(shared.quiz);
    assert_eq!(quiz.answer(2), Answer::Correct);
    quiz.next();
    assert!(quiz.is_complete());

    assert_eq!(days_together(&shared.analytics), "1024");
    assert!(fx.store.get_project(project_id).await.unwrap().is_some());
}

fn love_os(config: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_love-os"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_cli_issue_and_redeem() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("love-os.yaml");
    std::fs::write(&config, "database: data/love.db\nshare:\n  code_length: 10\n").unwrap();

    assert!(love_os(&config, &["init"]).status.success());
    assert!(dir.path().join("data/love.db").exists());

    let user = Uuid::now_v7().to_string();
    let created = love_os(&config, &["create-project", "--user", &user, "--partner", "Alex"]);
    assert!(created.status.success());
    let project_id = String::from_utf8(created.stdout).unwrap().trim().to_string();

    let issued = love_os(&config, &["issue", &project_id]);
    assert!(issued.status.success());
    let code = String::from_utf8(issued.stdout).unwrap().trim().to_string();
    assert_eq!(code.len(), 10);

    let redeemed = love_os(&config, &["redeem", &code.to_lowercase()]);
    assert!(redeemed.status.success());
    assert_eq!(String::from_utf8(redeemed.stdout).unwrap().trim(), project_id);

    let missing = love_os(&config, &["redeem", "ABCDEFGHJK"]);
    assert_eq!(missing.status.code(), Some(2));

    let unknown = love_os(&config, &["issue", &Uuid::now_v7().to_string()]);
    assert_eq!(unknown.status.code(), Some(1));
}
