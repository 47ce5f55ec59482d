//! Default implementations of the port traits.

use crate::ports::{ProgressEvent, ProgressSink};
use tracing::{debug, info, warn};

/// `ProgressSink` that forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::ProjectStarted { path } => info!(project = %path, "migrating project"),
            ProgressEvent::DocumentStarted { path } => debug!(document = %path, "analyzing"),
            ProgressEvent::AnalyzerSkipped { analyzer } => {
                debug!(analyzer = %analyzer, "no fixer registered; skipping")
            }
            ProgressEvent::FixApplied {
                path,
                analyzer,
                title,
            } => info!(document = %path, analyzer = %analyzer, "{title}"),
            ProgressEvent::FixFailed {
                path,
                analyzer,
                error,
            } => warn!(document = %path, analyzer = %analyzer, "fix could not be applied: {error}"),
            ProgressEvent::PassFinished { path, outcome } => debug!(
                document = %path,
                analyzer = %outcome.analyzer,
                initial = outcome.initial,
                applied = outcome.applied,
                remaining = outcome.remaining,
                stop = ?outcome.stop,
                "pass finished"
            ),
            ProgressEvent::DocumentAbandoned { path, error } => {
                warn!(document = %path, "analysis failed, document skipped: {error}")
            }
            ProgressEvent::ProjectFileEdited { path, operation } => {
                info!(project = %path, "{operation}")
            }
            ProgressEvent::ProjectFinished {
                path,
                status,
                files_written,
            } => info!(project = %path, status = ?status, files_written, "project finished"),
            ProgressEvent::ProjectFailed { path, error } => {
                warn!(project = %path, "project failed: {error}")
            }
        }
    }
}
