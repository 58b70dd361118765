//! In-memory record store.
//!
//! Implements the same capabilities as the SQLite store with plain maps, so
//! services can be exercised without a database. It can also be switched into
//! an "unavailable" state to simulate a backend outage.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use share_code::AccessCodeDigest;
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{AnalyticsItem, Project, QuizQuestion, ShareRecord, TerminalCommand};
use crate::store::{ContentStore, ShareStore};

#[derive(Debug, Default)]
struct Tables {
    /// Digest hex -> share record
    shares: HashMap<String, ShareRecord>,
    /// Project ID -> project
    projects: HashMap<Uuid, Project>,
    /// (Project ID, question number) -> question
    quiz: HashMap<(Uuid, i64), QuizQuestion>,
    /// Command ID -> command
    terminal: HashMap<Uuid, TerminalCommand>,
    /// Item ID -> item
    analytics: HashMap<Uuid, AnalyticsItem>,
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    writes_failing: AtomicBool,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with [`StoreError::Unavailable`]
    /// while reads keep working.
    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// All persisted share digests, for inspecting what was stored.
    pub fn share_digests(&self) -> Vec<String> {
        self.read().shares.keys().cloned().collect()
    }

    pub fn share_count(&self) -> usize {
        self.read().shares.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        self.check_available()?;
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().expect("memory store poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().expect("memory store poisoned")
    }
}

fn sorted_by<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    rows
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn insert_share(&self, record: &ShareRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.write();
        let key = record.digest.as_str().to_string();
        if tables.shares.contains_key(&key) {
            return Err(StoreError::Conflict("share digest already exists".to_string()));
        }
        tables.shares.insert(key, record.clone());
        Ok(())
    }

    async fn find_share(
        &self,
        digest: &AccessCodeDigest,
    ) -> Result<Option<ShareRecord>, StoreError> {
        self.check_available()?;
        Ok(self.read().shares.get(digest.as_str()).cloned())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.write();
        if tables.projects.contains_key(&project.id)
            || tables.projects.values().any(|p| p.user_id == project.user_id)
        {
            return Err(StoreError::Conflict(format!("project {}", project.id)));
        }
        tables.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError> {
        self.check_available()?;
        Ok(self.read().projects.get(&project_id).cloned())
    }

    async fn project_for_user(&self, user_id: Uuid) -> Result<Option<Project>, StoreError> {
        self.check_available()?;
        Ok(self
            .read()
            .projects
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn update_project(&self, project: &Project) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut tables = self.write();
        match tables.projects.get_mut(&project.id) {
            Some(existing) => {
                *existing = project.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_quiz(&self, project_id: Uuid) -> Result<Vec<QuizQuestion>, StoreError> {
        self.check_available()?;
        let rows: Vec<QuizQuestion> = self
            .read()
            .quiz
            .values()
            .filter(|q| q.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |q| q.question_number))
    }

    async fn upsert_quiz(&self, questions: &[QuizQuestion]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.write();
        for question in questions {
            let key = (question.project_id, question.question_number);
            if tables.quiz.iter().any(|(k, q)| q.id == question.id && *k != key) {
                return Err(StoreError::Conflict(format!("quiz question {}", question.id)));
            }
        }
        for question in questions {
            let key = (question.project_id, question.question_number);
            // Keep the original row ID on conflict, like the SQL upsert
            let id = tables.quiz.get(&key).map_or(question.id, |q| q.id);
            tables.quiz.insert(
                key,
                QuizQuestion {
                    id,
                    ..question.clone()
                },
            );
        }
        Ok(())
    }

    async fn list_terminal(&self, project_id: Uuid) -> Result<Vec<TerminalCommand>, StoreError> {
        self.check_available()?;
        let rows: Vec<TerminalCommand> = self
            .read()
            .terminal
            .values()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |c| (c.sort_order, c.id)))
    }

    async fn upsert_terminal(&self, commands: &[TerminalCommand]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.write();
        for command in commands {
            if tables
                .terminal
                .get(&command.id)
                .is_some_and(|existing| existing.project_id != command.project_id)
            {
                return Err(StoreError::Conflict(format!("terminal command {}", command.id)));
            }
        }
        for command in commands {
            tables.terminal.insert(command.id, command.clone());
        }
        Ok(())
    }

    async fn delete_terminal(&self, command_id: Uuid) -> Result<bool, StoreError> {
        self.check_writable()?;
        Ok(self.write().terminal.remove(&command_id).is_some())
    }

    async fn list_analytics(&self, project_id: Uuid) -> Result<Vec<AnalyticsItem>, StoreError> {
        self.check_available()?;
        let rows: Vec<AnalyticsItem> = self
            .read()
            .analytics
            .values()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |a| (a.sort_order, a.id)))
    }

    async fn upsert_analytics(&self, items: &[AnalyticsItem]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.write();
        for item in items {
            if tables
                .analytics
                .get(&item.id)
                .is_some_and(|existing| existing.project_id != item.project_id)
            {
                return Err(StoreError::Conflict(format!("analytics item {}", item.id)));
            }
        }
        for item in items {
            tables.analytics.insert(item.id, item.clone());
        }
        Ok(())
    }

    async fn delete_analytics(&self, item_id: Uuid) -> Result<bool, StoreError> {
        self.check_writable()?;
        Ok(self.write().analytics.remove(&item_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use share_code::compute_digest;

    #[tokio::test]
    async fn test_share_lookup_by_digest() {
        let store = MemoryStore::new();
        let project_id = Uuid::now_v7();
        let record = ShareRecord::new(compute_digest("ABCD2345"), project_id);
        store.insert_share(&record).await.unwrap();

        let found = store.find_share(&compute_digest("ABCD2345")).await.unwrap();
        assert_eq!(found, Some(record));
        assert!(store
            .find_share(&compute_digest("ZZZZ9999"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_digest_conflicts() {
        let store = MemoryStore::new();
        let digest = compute_digest("ABCD2345");
        store
            .insert_share(&ShareRecord::new(digest.clone(), Uuid::now_v7()))
            .await
            .unwrap();
        let result = store
            .insert_share(&ShareRecord::new(digest, Uuid::now_v7()))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let result = store.find_share(&compute_digest("ABCD2345")).await;
        assert!(matches!(result, Err(StoreError::Unavailable)));

        store.set_unavailable(false);
        assert!(store
            .find_share(&compute_digest("ABCD2345"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_quiz_upsert_keeps_row_id() {
        let store = MemoryStore::new();
        let project_id = Uuid::now_v7();
        let first = QuizQuestion::new(project_id, 1, "First date?", ["a", "b", "c", "d"], 1);
        store.upsert_quiz(&[first.clone()]).await.unwrap();

        let replacement = QuizQuestion::new(project_id, 1, "First kiss?", ["a", "b", "c", "d"], 2);
        store.upsert_quiz(&[replacement]).await.unwrap();

        let quiz = store.list_quiz(project_id).await.unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].id, first.id);
        assert_eq!(quiz[0].question, "First kiss?");
        assert_eq!(quiz[0].correct_option, 2);
    }

    #[tokio::test]
    async fn test_one_project_per_user() {
        let store = MemoryStore::new();
        let user = Uuid::now_v7();
        store.insert_project(&Project::new(user)).await.unwrap();
        let result = store.insert_project(&Project::new(user)).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }
}
