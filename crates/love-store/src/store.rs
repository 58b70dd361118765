//! Record store capabilities.
//!
//! Services never reach for a global database client. They are handed a store
//! implementing these traits: [`SqliteStore`](crate::sqlite::SqliteStore) in
//! production, [`MemoryStore`](crate::memory::MemoryStore) in tests.

use async_trait::async_trait;
use share_code::AccessCodeDigest;
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{AnalyticsItem, Project, QuizQuestion, ShareRecord, TerminalCommand};

/// Persistence for share records. Only two query shapes are needed.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Insert a new share record.
    async fn insert_share(&self, record: &ShareRecord) -> Result<(), StoreError>;

    /// Find the share record with exactly this digest, if any.
    async fn find_share(
        &self,
        digest: &AccessCodeDigest,
    ) -> Result<Option<ShareRecord>, StoreError>;
}

/// Persistence for project content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError>;

    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError>;

    /// A user owns at most one project.
    async fn project_for_user(&self, user_id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Replace the stored project. Returns `false` if it does not exist.
    async fn update_project(&self, project: &Project) -> Result<bool, StoreError>;

    /// Questions ordered by `question_number`.
    async fn list_quiz(&self, project_id: Uuid) -> Result<Vec<QuizQuestion>, StoreError>;

    /// Insert or replace questions keyed by `(project_id, question_number)`.
    async fn upsert_quiz(&self, questions: &[QuizQuestion]) -> Result<(), StoreError>;

    /// Commands ordered by `sort_order`.
    async fn list_terminal(&self, project_id: Uuid) -> Result<Vec<TerminalCommand>, StoreError>;

    async fn upsert_terminal(&self, commands: &[TerminalCommand]) -> Result<(), StoreError>;

    async fn delete_terminal(&self, command_id: Uuid) -> Result<bool, StoreError>;

    /// Items ordered by `sort_order`.
    async fn list_analytics(&self, project_id: Uuid) -> Result<Vec<AnalyticsItem>, StoreError>;

    async fn upsert_analytics(&self, items: &[AnalyticsItem]) -> Result<(), StoreError>;

    async fn delete_analytics(&self, item_id: Uuid) -> Result<bool, StoreError>;
}
