//! Error types for analysis and fix application.

use camino::Utf8PathBuf;
use thiserror::Error;
use winui_migrate_types::{DocumentId, TextSpan};
use winui_migrate_workspace::SnapshotError;

/// The compilation or an analyzer could not produce diagnostics.
///
/// The rewrite loop abandons the current document when it sees this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{path}: cannot tokenize at byte {offset}: {message}")]
    Syntax {
        path: Utf8PathBuf,
        offset: usize,
        message: String,
    },

    #[error("analyzer {analyzer} failed: {message}")]
    Analyzer { analyzer: String, message: String },
}

/// A fix action could not be turned into a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixApplicationError {
    #[error("document {0} is not part of the snapshot")]
    DocumentMissing(DocumentId),

    #[error("edit {span:?} is out of bounds or not on a character boundary")]
    InvalidSpan { span: TextSpan },

    #[error("edits overlap at {span:?}")]
    OverlappingEdits { span: TextSpan },

    #[error("expected {expected:?} at {span:?}, found {found:?}")]
    StaleEdit {
        span: TextSpan,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
