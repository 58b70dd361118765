pub mod configuration;
pub mod error;
pub mod media;
pub mod memory;
pub mod metric;
pub mod project;
pub mod quiz;
pub mod records;
pub mod share;
pub mod sqlite;
pub mod store;
pub mod terminal;
pub mod voice;
pub mod wrapped;

pub use error::{ConfigError, ContentError, ShareError, StoreError};
pub use records::{
    AnalyticsItem, Project, QuizQuestion, ShareRecord, SharedProject, SongMeta, TerminalCommand,
};
pub use store::{ContentStore, ShareStore};
