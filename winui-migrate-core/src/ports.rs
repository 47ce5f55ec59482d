//! Port traits abstracting progress output away from the pipeline.

use camino::Utf8PathBuf;
use winui_migrate_types::report::{CommitStatus, PassOutcome};

/// Something worth telling the user while a migration runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    ProjectStarted {
        path: Utf8PathBuf,
    },
    DocumentStarted {
        path: Utf8PathBuf,
    },
    /// No fixer is registered for this analyzer's diagnostics.
    AnalyzerSkipped {
        analyzer: String,
    },
    FixApplied {
        path: Utf8PathBuf,
        analyzer: String,
        title: String,
    },
    FixFailed {
        path: Utf8PathBuf,
        analyzer: String,
        error: String,
    },
    PassFinished {
        path: Utf8PathBuf,
        outcome: PassOutcome,
    },
    /// Analysis failed; the rest of this document's passes were abandoned.
    DocumentAbandoned {
        path: Utf8PathBuf,
        error: String,
    },
    ProjectFileEdited {
        path: Utf8PathBuf,
        operation: String,
    },
    ProjectFinished {
        path: Utf8PathBuf,
        status: CommitStatus,
        files_written: u64,
    },
    ProjectFailed {
        path: Utf8PathBuf,
        error: String,
    },
}

/// Receives progress events. Implementations must not fail the run.
pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}
