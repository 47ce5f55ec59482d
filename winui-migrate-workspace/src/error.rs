//! Error types for winui-migrate-workspace.
//!
//! Setup errors (`ConfigurationError`, `LoadError`) fail the run before any
//! analysis starts. `PersistenceError` is the only error the commit gate
//! reports; it means nothing was left half-written.

use camino::Utf8PathBuf;
use thiserror::Error;
use winui_migrate_types::DocumentId;

/// Invalid or missing input path.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("workspace path cannot be empty")]
    EmptyPath,

    #[error("workspace path not found: {path}")]
    NotFound { path: Utf8PathBuf },
}

/// Failure to open a project or parse a solution.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("project file not found: {path}")]
    NotFound { path: Utf8PathBuf },

    #[error(transparent)]
    RootElement(#[from] RootElementError),

    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern {pattern}: {message}")]
    Glob { pattern: String, message: String },

    #[error("invalid solution file {path}: {message}")]
    Solution { path: Utf8PathBuf, message: String },
}

/// Failure to open or edit a project root element.
#[derive(Debug, Error)]
pub enum RootElementError {
    #[error("the project file '{path}' does not exist or is inaccessible")]
    NotFound { path: Utf8PathBuf },

    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed project xml in {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("no element at index {index}")]
    NoSuchElement { index: usize },
}

/// A fork that would break the snapshot invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("document {0} is not part of this snapshot")]
    UnknownDocument(DocumentId),
}

/// Final commit failure. Nothing on disk was changed when this is returned.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot belongs to a different project")]
    ForeignSnapshot,

    #[error("snapshot still carries {count} auxiliary input(s)")]
    AuxiliaryInputsPresent { count: usize },

    #[error("document {path} was removed; removing files is not supported")]
    DocumentRemoved { path: Utf8PathBuf },

    #[error("precondition mismatch: {path} changed on disk since it was loaded")]
    PreconditionMismatch { path: Utf8PathBuf },

    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
