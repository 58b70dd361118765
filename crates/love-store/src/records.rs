//! Persisted record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use share_code::AccessCodeDigest;
use uuid::Uuid;

// ============================================================================
// Shares
// ============================================================================

/// Link from a share code digest to the project it unlocks.
///
/// Created once per issuance and never updated. The plaintext code is not
/// part of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRecord {
    pub id: Uuid,
    pub digest: AccessCodeDigest,
    pub project_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ShareRecord {
    pub fn new(digest: AccessCodeDigest, project_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            digest,
            project_id,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Song shown in the music gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMeta {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
}

/// A user's personalization project: the unit that gets shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub partner_name: String,
    pub initial_1: String,
    pub initial_2: String,
    /// Phrase to speak at the voice gate. Empty disables the gate.
    pub voice_word: String,
    pub voice_file_path: Option<String>,
    pub collage_path: Option<String>,
    pub songs_meta: Vec<SongMeta>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            partner_name: String::new(),
            initial_1: String::new(),
            initial_2: String::new(),
            voice_word: String::new(),
            voice_file_path: None,
            collage_path: None,
            songs_meta: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_partner(mut self, partner_name: impl Into<String>) -> Self {
        self.partner_name = partner_name.into();
        self
    }

    /// The voice gate applies only when both a phrase and a recording exist.
    pub fn requires_voice_unlock(&self) -> bool {
        !self.voice_word.trim().is_empty()
            && self
                .voice_file_path
                .as_deref()
                .is_some_and(|path| !path.is_empty())
    }
}

// ============================================================================
// Mini-app content
// ============================================================================

/// One multiple-choice question of the relationship quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub project_id: Uuid,
    /// 1-based position; unique per project.
    pub question_number: i64,
    pub question: String,
    pub options: [String; 4],
    /// 1-based index into `options`.
    pub correct_option: i64,
}

impl QuizQuestion {
    pub fn new(
        project_id: Uuid,
        question_number: i64,
        question: impl Into<String>,
        options: [&str; 4],
        correct_option: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            project_id,
            question_number,
            question: question.into(),
            options: options.map(|option| option.to_string()),
            correct_option,
        }
    }
}

/// A custom command of the terminal easter-egg app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalCommand {
    pub id: Uuid,
    pub project_id: Uuid,
    pub command: String,
    pub output: String,
    pub sort_order: i64,
}

impl TerminalCommand {
    pub fn new(
        project_id: Uuid,
        command: impl Into<String>,
        output: impl Into<String>,
        sort_order: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            project_id,
            command: command.into(),
            output: output.into(),
            sort_order,
        }
    }
}

/// One stat card of the wrapped recap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsItem {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub value: String,
    pub subtitle: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub max_value: Option<i64>,
    pub sort_order: i64,
}

impl AnalyticsItem {
    pub fn new(
        project_id: Uuid,
        title: impl Into<String>,
        value: impl Into<String>,
        sort_order: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            project_id,
            title: title.into(),
            value: value.into(),
            subtitle: String::new(),
            icon: "heart".to_string(),
            kind: "stat".to_string(),
            max_value: None,
            sort_order,
        }
    }
}

/// Everything a partner sees after entering a valid share code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedProject {
    pub project: Project,
    pub analytics: Vec<AnalyticsItem>,
    pub quiz: Vec<QuizQuestion>,
    pub terminal: Vec<TerminalCommand>,
}

impl SharedProject {
    pub fn requires_voice_unlock(&self) -> bool {
        self.project.requires_voice_unlock()
    }
}
