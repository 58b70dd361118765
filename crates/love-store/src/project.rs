//! Editing a user's project and its mini-app content.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ContentError;
use crate::records::{AnalyticsItem, Project, QuizQuestion, TerminalCommand};
use crate::store::ContentStore;
use crate::terminal::{RESERVED_COMMANDS, normalize_command};

/// Owner-side operations on projects.
pub struct ProjectService<S> {
    store: Arc<S>,
}

impl<S: ContentStore> ProjectService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create the user's project. Each user has at most one.
    pub async fn create_project(
        &self,
        user_id: Uuid,
        partner_name: &str,
    ) -> Result<Project, ContentError> {
        if self.store.project_for_user(user_id).await?.is_some() {
            return Err(ContentError::ProjectExists(user_id));
        }
        let project = Project::new(user_id).with_partner(partner_name.trim());
        self.store.insert_project(&project).await?;
        log::info!("Created project {} for user {}", project.id, user_id);
        Ok(project)
    }

    pub async fn project_for_user(&self, user_id: Uuid) -> Result<Option<Project>, ContentError> {
        Ok(self.store.project_for_user(user_id).await?)
    }

    /// Apply `edit` to the stored project and save it.
    pub async fn update_project<F>(&self, project_id: Uuid, edit: F) -> Result<Project, ContentError>
    where
        F: FnOnce(&mut Project) + Send,
    {
        let mut project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or(ContentError::ProjectNotFound(project_id))?;

        edit(&mut project);
        // Identity fields are not editable
        project.id = project_id;
        project.updated_at = Utc::now();

        if !self.store.update_project(&project).await? {
            return Err(ContentError::ProjectNotFound(project_id));
        }
        Ok(project)
    }

    pub async fn quiz(&self, project_id: Uuid) -> Result<Vec<QuizQuestion>, ContentError> {
        Ok(self.store.list_quiz(project_id).await?)
    }

    /// Validate and store quiz questions for a project.
    pub async fn save_quiz(
        &self,
        project_id: Uuid,
        questions: Vec<QuizQuestion>,
    ) -> Result<(), ContentError> {
        self.require_project(project_id).await?;
        for question in &questions {
            validate_question(project_id, question)?;
        }
        self.store.upsert_quiz(&questions).await?;
        Ok(())
    }

    pub async fn terminal(&self, project_id: Uuid) -> Result<Vec<TerminalCommand>, ContentError> {
        Ok(self.store.list_terminal(project_id).await?)
    }

    /// Store custom terminal commands, normalizing their names.
    pub async fn save_terminal(
        &self,
        project_id: Uuid,
        mut commands: Vec<TerminalCommand>,
    ) -> Result<(), ContentError> {
        self.require_project(project_id).await?;
        for command in &mut commands {
            command.project_id = project_id;
            command.command = normalize_command(&command.command);
            if command.command.is_empty() {
                return Err(ContentError::InvalidCommand("empty command".to_string()));
            }
            if RESERVED_COMMANDS.contains(&command.command.as_str()) {
                return Err(ContentError::InvalidCommand(format!(
                    "'{}' is built in",
                    command.command
                )));
            }
        }
        self.store.upsert_terminal(&commands).await?;
        Ok(())
    }

    pub async fn delete_terminal(&self, command_id: Uuid) -> Result<bool, ContentError> {
        Ok(self.store.delete_terminal(command_id).await?)
    }

    pub async fn analytics(&self, project_id: Uuid) -> Result<Vec<AnalyticsItem>, ContentError> {
        Ok(self.store.list_analytics(project_id).await?)
    }

    pub async fn save_analytics(
        &self,
        project_id: Uuid,
        mut items: Vec<AnalyticsItem>,
    ) -> Result<(), ContentError> {
        self.require_project(project_id).await?;
        for item in &mut items {
            item.project_id = project_id;
        }
        self.store.upsert_analytics(&items).await?;
        Ok(())
    }

    pub async fn delete_analytics(&self, item_id: Uuid) -> Result<bool, ContentError> {
        Ok(self.store.delete_analytics(item_id).await?)
    }

    async fn require_project(&self, project_id: Uuid) -> Result<(), ContentError> {
        match self.store.get_project(project_id).await? {
            Some(_) => Ok(()),
            None => Err(ContentError::ProjectNotFound(project_id)),
        }
    }
}

fn validate_question(project_id: Uuid, question: &QuizQuestion) -> Result<(), ContentError> {
    let invalid = |reason: &str| ContentError::InvalidQuestion {
        question_number: question.question_number,
        reason: reason.to_string(),
    };

    if question.project_id != project_id {
        return Err(invalid("belongs to another project"));
    }
    if question.question_number < 1 {
        return Err(invalid("question number must start at 1"));
    }
    if !(1..=4).contains(&question.correct_option) {
        return Err(invalid("correct option must be between 1 and 4"));
    }
    if question.question.trim().is_empty() {
        return Err(invalid("question text is empty"));
    }
    Ok(())
}
