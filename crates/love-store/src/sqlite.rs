//! SQLite-backed record store.
//!
//! Each call opens its own connection on the blocking thread pool, so the
//! store is cheap to share between tasks and never holds a connection across
//! an `.await`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use share_code::AccessCodeDigest;
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{
    AnalyticsItem, Project, QuizQuestion, ShareRecord, SongMeta, TerminalCommand,
};
use crate::store::{ContentStore, ShareStore};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL UNIQUE,
    partner_name TEXT NOT NULL DEFAULT '',
    initial_1 TEXT NOT NULL DEFAULT '',
    initial_2 TEXT NOT NULL DEFAULT '',
    voice_word TEXT NOT NULL DEFAULT '',
    voice_file_path TEXT,
    collage_path TEXT,
    songs_meta TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS shares (
    id BLOB PRIMARY KEY,
    project_id BLOB NOT NULL,
    access_code_hash TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
CREATE TABLE IF NOT EXISTS quiz (
    id BLOB PRIMARY KEY,
    project_id BLOB NOT NULL,
    question_number INTEGER NOT NULL,
    question TEXT NOT NULL DEFAULT '',
    option_1 TEXT NOT NULL DEFAULT '',
    option_2 TEXT NOT NULL DEFAULT '',
    option_3 TEXT NOT NULL DEFAULT '',
    option_4 TEXT NOT NULL DEFAULT '',
    correct_option INTEGER NOT NULL DEFAULT 1,
    UNIQUE (project_id, question_number),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
CREATE TABLE IF NOT EXISTS terminal (
    id BLOB PRIMARY KEY,
    project_id BLOB NOT NULL,
    command TEXT NOT NULL DEFAULT '',
    output TEXT NOT NULL DEFAULT '',
    sort_order INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
CREATE TABLE IF NOT EXISTS analytics (
    id BLOB PRIMARY KEY,
    project_id BLOB NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    value TEXT NOT NULL DEFAULT '',
    subtitle TEXT NOT NULL DEFAULT '',
    icon TEXT NOT NULL DEFAULT 'heart',
    type TEXT NOT NULL DEFAULT 'stat',
    max_value INTEGER,
    sort_order INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
"#;

const PROJECT_COLUMNS: &str = "id, user_id, partner_name, initial_1, initial_2, voice_word, \
     voice_file_path, collage_path, songs_meta, created_at, updated_at";

// ============================================================================
// Store
// ============================================================================

/// Record store backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open the database at `db_path`, creating it and its tables if needed.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = open_connection(&db_path)?;
        conn.execute_batch(SCHEMA)?;
        log::info!("Opened record store at {}", db_path.display());

        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` on a fresh connection on the blocking thread pool.
    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = open_connection(&db_path)?;
            f(&mut conn)
        })
        .await?
    }
}

fn open_connection(db_path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Map constraint violations to [`StoreError::Conflict`].
fn conflict(e: rusqlite::Error, what: String) -> StoreError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _) if err.code == ErrorCode::ConstraintViolation => {
            StoreError::Conflict(what)
        }
        other => StoreError::Database(other),
    }
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

// ============================================================================
// Row mapping
// ============================================================================

fn share_from_row(row: &Row<'_>) -> rusqlite::Result<ShareRecord> {
    let digest: String = row.get(2)?;
    Ok(ShareRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        digest: AccessCodeDigest::from_hex(digest).map_err(|e| conversion_error(2, e))?,
        created_at: row.get(3)?,
    })
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let songs_json: String = row.get(8)?;
    let songs_meta: Vec<SongMeta> =
        serde_json::from_str(&songs_json).map_err(|e| conversion_error(8, e))?;
    Ok(Project {
        id: row.get(0)?,
        user_id: row.get(1)?,
        partner_name: row.get(2)?,
        initial_1: row.get(3)?,
        initial_2: row.get(4)?,
        voice_word: row.get(5)?,
        voice_file_path: row.get(6)?,
        collage_path: row.get(7)?,
        songs_meta,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn quiz_from_row(row: &Row<'_>) -> rusqlite::Result<QuizQuestion> {
    Ok(QuizQuestion {
        id: row.get(0)?,
        project_id: row.get(1)?,
        question_number: row.get(2)?,
        question: row.get(3)?,
        options: [row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?],
        correct_option: row.get(8)?,
    })
}

fn terminal_from_row(row: &Row<'_>) -> rusqlite::Result<TerminalCommand> {
    Ok(TerminalCommand {
        id: row.get(0)?,
        project_id: row.get(1)?,
        command: row.get(2)?,
        output: row.get(3)?,
        sort_order: row.get(4)?,
    })
}

fn analytics_from_row(row: &Row<'_>) -> rusqlite::Result<AnalyticsItem> {
    Ok(AnalyticsItem {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        value: row.get(3)?,
        subtitle: row.get(4)?,
        icon: row.get(5)?,
        kind: row.get(6)?,
        max_value: row.get(7)?,
        sort_order: row.get(8)?,
    })
}

fn songs_json(project: &Project) -> Result<String, StoreError> {
    serde_json::to_string(&project.songs_meta).map_err(|e| StoreError::Corrupt(e.to_string()))
}

// ============================================================================
// Share records
// ============================================================================

#[async_trait]
impl ShareStore for SqliteStore {
    async fn insert_share(&self, record: &ShareRecord) -> Result<(), StoreError> {
        let record = record.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO shares (id, project_id, access_code_hash, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id,
                    record.project_id,
                    record.digest.as_str(),
                    record.created_at
                ],
            )
            .map_err(|e| conflict(e, format!("share for project {}", record.project_id)))?;
            Ok(())
        })
        .await
    }

    async fn find_share(
        &self,
        digest: &AccessCodeDigest,
    ) -> Result<Option<ShareRecord>, StoreError> {
        let digest = digest.as_str().to_string();
        self.run(move |conn| {
            let record = conn
                .query_row(
                    "SELECT id, project_id, access_code_hash, created_at FROM shares \
                     WHERE access_code_hash = ?1 LIMIT 1",
                    [&digest],
                    share_from_row,
                )
                .optional()?;
            Ok(record)
        })
        .await
    }
}

// ============================================================================
// Project content
// ============================================================================

#[async_trait]
impl ContentStore for SqliteStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        let project = project.clone();
        let songs = songs_json(&project)?;
        self.run(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO projects ({PROJECT_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                params![
                    project.id,
                    project.user_id,
                    project.partner_name,
                    project.initial_1,
                    project.initial_2,
                    project.voice_word,
                    project.voice_file_path,
                    project.collage_path,
                    songs,
                    project.created_at,
                    project.updated_at,
                ],
            )
            .map_err(|e| conflict(e, format!("project for user {}", project.user_id)))?;
            Ok(())
        })
        .await
    }

    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError> {
        self.run(move |conn| {
            let project = conn
                .query_row(
                    &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                    [project_id],
                    project_from_row,
                )
                .optional()?;
            Ok(project)
        })
        .await
    }

    async fn project_for_user(&self, user_id: Uuid) -> Result<Option<Project>, StoreError> {
        self.run(move |conn| {
            let project = conn
                .query_row(
                    &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = ?1"),
                    [user_id],
                    project_from_row,
                )
                .optional()?;
            Ok(project)
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> Result<bool, StoreError> {
        let project = project.clone();
        let songs = songs_json(&project)?;
        self.run(move |conn| {
            let changed = conn.execute(
                "UPDATE projects SET partner_name = ?2, initial_1 = ?3, initial_2 = ?4, \
                 voice_word = ?5, voice_file_path = ?6, collage_path = ?7, songs_meta = ?8, \
                 updated_at = ?9 WHERE id = ?1",
                params![
                    project.id,
                    project.partner_name,
                    project.initial_1,
                    project.initial_2,
                    project.voice_word,
                    project.voice_file_path,
                    project.collage_path,
                    songs,
                    project.updated_at,
                ],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn list_quiz(&self, project_id: Uuid) -> Result<Vec<QuizQuestion>, StoreError> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, question_number, question, option_1, option_2, \
                 option_3, option_4, correct_option FROM quiz \
                 WHERE project_id = ?1 ORDER BY question_number",
            )?;
            let questions = stmt
                .query_map([project_id], quiz_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(questions)
        })
        .await
    }

    async fn upsert_quiz(&self, questions: &[QuizQuestion]) -> Result<(), StoreError> {
        let questions = questions.to_vec();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO quiz (id, project_id, question_number, question, \
                     option_1, option_2, option_3, option_4, correct_option) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
                     ON CONFLICT(project_id, question_number) DO UPDATE SET \
                     question = excluded.question, option_1 = excluded.option_1, \
                     option_2 = excluded.option_2, option_3 = excluded.option_3, \
                     option_4 = excluded.option_4, correct_option = excluded.correct_option",
                )?;
                for q in &questions {
                    let [o1, o2, o3, o4] = &q.options;
                    stmt.execute(params![
                        q.id,
                        q.project_id,
                        q.question_number,
                        q.question,
                        o1,
                        o2,
                        o3,
                        o4,
                        q.correct_option,
                    ])
                    .map_err(|e| conflict(e, format!("quiz for project {}", q.project_id)))?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn list_terminal(&self, project_id: Uuid) -> Result<Vec<TerminalCommand>, StoreError> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, command, output, sort_order FROM terminal \
                 WHERE project_id = ?1 ORDER BY sort_order, id",
            )?;
            let commands = stmt
                .query_map([project_id], terminal_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(commands)
        })
        .await
    }

    async fn upsert_terminal(&self, commands: &[TerminalCommand]) -> Result<(), StoreError> {
        let commands = commands.to_vec();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO terminal (id, project_id, command, output, sort_order) \
                     VALUES (?1, ?2, ?3, ?4, ?5) \
                     ON CONFLICT(id) DO UPDATE SET command = excluded.command, \
                     output = excluded.output, sort_order = excluded.sort_order \
                     WHERE terminal.project_id = excluded.project_id",
                )?;
                for c in &commands {
                    let what = || format!("terminal command {}", c.id);
                    let changed = stmt
                        .execute(params![c.id, c.project_id, c.command, c.output, c.sort_order])
                        .map_err(|e| conflict(e, what()))?;
                    // The row ID belongs to another project
                    if changed == 0 {
                        return Err(StoreError::Conflict(what()));
                    }
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete_terminal(&self, command_id: Uuid) -> Result<bool, StoreError> {
        self.run(move |conn| {
            let deleted = conn.execute("DELETE FROM terminal WHERE id = ?1", [command_id])?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn list_analytics(&self, project_id: Uuid) -> Result<Vec<AnalyticsItem>, StoreError> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, title, value, subtitle, icon, type, max_value, \
                 sort_order FROM analytics WHERE project_id = ?1 ORDER BY sort_order, id",
            )?;
            let items = stmt
                .query_map([project_id], analytics_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
    }

    async fn upsert_analytics(&self, items: &[AnalyticsItem]) -> Result<(), StoreError> {
        let items = items.to_vec();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO analytics (id, project_id, title, value, subtitle, icon, \
                     type, max_value, sort_order) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
                     ON CONFLICT(id) DO UPDATE SET title = excluded.title, \
                     value = excluded.value, subtitle = excluded.subtitle, icon = excluded.icon, \
                     type = excluded.type, max_value = excluded.max_value, \
                     sort_order = excluded.sort_order \
                     WHERE analytics.project_id = excluded.project_id",
                )?;
                for a in &items {
                    let what = || format!("analytics item {}", a.id);
                    let changed = stmt.execute(params![
                        a.id,
                        a.project_id,
                        a.title,
                        a.value,
                        a.subtitle,
                        a.icon,
                        a.kind,
                        a.max_value,
                        a.sort_order,
                    ])
                    .map_err(|e| conflict(e, what()))?;
                    if changed == 0 {
                        return Err(StoreError::Conflict(what()));
                    }
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete_analytics(&self, item_id: Uuid) -> Result<bool, StoreError> {
        self.run(move |conn| {
            let deleted = conn.execute("DELETE FROM analytics WHERE id = ?1", [item_id])?;
            Ok(deleted > 0)
        })
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================
