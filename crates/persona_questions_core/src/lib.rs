//! Core domain logic for the persona question editor.
//! This crate is the single source of truth for question bank invariants;
//! presentation layers only call into it.

pub mod bank;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;

pub use bank::{BankError, BankResult, LoadPolicy, QuestionBank};
pub use config::{ConfigError, EditorConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::question::{
    Category, QuestionFields, QuestionRecord, QuestionValidationError, MAX_PRIORITY, MIN_PRIORITY,
};
pub use model::stage::{PermutationDefect, Stage, StageError, DEFAULT_STAGE_STATUS};
pub use service::edit_session::{EditSession, SessionError, SessionResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
