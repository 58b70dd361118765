//! Error types for the record store and the services built on it.

use share_code::ShareCodeError;
use thiserror::Error;
use uuid::Uuid;

/// Failure talking to the record store.
///
/// Always a backend fault, never a "not found": lookups that match nothing
/// return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("record store unavailable")]
    Unavailable,

    #[error("conflicting record: {0}")]
    Conflict(String),

    #[error("invalid stored data: {0}")]
    Corrupt(String),
}

/// Errors from issuing or redeeming share codes.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The entered code was rejected before any store call.
    #[error("invalid share code: {0}")]
    Code(#[from] ShareCodeError),

    #[error("project {0} does not exist")]
    UnknownProject(Uuid),

    #[error("project {project_id} is not owned by user {user_id}")]
    NotOwner { project_id: Uuid, user_id: Uuid },

    /// The store was unreachable or the write failed. Not retried.
    #[error("backend error: {0}")]
    Backend(#[from] StoreError),
}

impl ShareError {
    /// Whether the caller may succeed by trying again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, ShareError::Backend(_))
    }
}

/// Errors from editing project content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("project {0} does not exist")]
    ProjectNotFound(Uuid),

    #[error("user {0} already has a project")]
    ProjectExists(Uuid),

    #[error("invalid quiz question {question_number}: {reason}")]
    InvalidQuestion { question_number: i64, reason: String },

    #[error("invalid terminal command: {0}")]
    InvalidCommand(String),

    #[error("backend error: {0}")]
    Backend(#[from] StoreError),
}

/// Errors from loading the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
