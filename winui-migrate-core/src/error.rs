//! Error type for pipeline results.
//!
//! Exit code 2 means at least one project could not be committed; 1 means
//! the tool itself failed (bad input path, unreadable project, I/O).

use thiserror::Error;
use winui_migrate_workspace::{ConfigurationError, LoadError};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{failed} of {total} project(s) could not be committed")]
    CommitFailed { failed: u64, total: u64 },
}

impl MigrationError {
    /// Returns true when the run completed but persisting failed somewhere.
    pub fn is_commit_failure(&self) -> bool {
        matches!(self, MigrationError::CommitFailed { .. })
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrationError::CommitFailed { .. } => 2,
            _ => 1,
        }
    }
}
