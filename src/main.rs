use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use love_store::configuration::Config;
use love_store::project::ProjectService;
use love_store::share::ShareService;
use love_store::sqlite::SqliteStore;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "love-os", about = "Issue and redeem Love OS share codes")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, default_value = "love-os.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database schema.
    Init,
    /// Create a project for a user.
    CreateProject {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        partner: String,
    },
    /// Issue a new share code for a project. The code is printed once.
    Issue { project_id: Uuid },
    /// Look up the project a share code belongs to.
    Redeem { code: String },
}

enum Outcome {
    Done,
    NotFound,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Set RUST_LOG=info for visibility.
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NotFound) => ExitCode::from(2),
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome, Box<dyn Error>> {
    let config = Config::load(&cli.config)?;
    let store = Arc::new(SqliteStore::open(&config.database)?);

    match cli.command {
        Command::Init => {
            log::info!("Database ready at {}", store.path().display());
        }
        Command::CreateProject { user, partner } => {
            let project = ProjectService::new(store)
                .create_project(user, &partner)
                .await?;
            println!("{}", project.id);
        }
        Command::Issue { project_id } => {
            let shares = ShareService::new(store, config.share.code_config()?);
            let code = shares.issue(project_id).await?;
            println!("{}", code.as_str());
        }
        Command::Redeem { code } => {
            let shares = ShareService::new(store, config.share.code_config()?);
            match shares.redeem(&code).await? {
                Some(project_id) => println!("{project_id}"),
                None => {
                    println!("not found");
                    return Ok(Outcome::NotFound);
                }
            }
        }
    }

    Ok(Outcome::Done)
}
