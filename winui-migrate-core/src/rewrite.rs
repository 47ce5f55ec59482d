//! The convergent analyzer/fixer loop.
//!
//! For every document, each analyzer gets one pass: fix the first
//! diagnostic, re-diagnose against the updated snapshot, repeat. A pass
//! stops when diagnostics are gone, no action is offered, a fix fails to
//! apply, or the attempt budget (the first diagnostic count) is spent.

use crate::ports::{ProgressEvent, ProgressSink};
use camino::Utf8Path;
use tracing::debug;
use winui_migrate_analyzers::{
    AnalysisError, Analyzer, CodeFix, FixContext, diagnostics_for, resolve_fixer,
};
use winui_migrate_types::DocumentId;
use winui_migrate_types::report::{DocumentOutcome, PassOutcome, StopReason};
use winui_migrate_workspace::ProjectSnapshot;

/// Final snapshot of a rewrite plus what happened to each document.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub snapshot: ProjectSnapshot,
    pub documents: Vec<DocumentOutcome>,
}

/// Run every analyzer over every document of `snapshot`.
///
/// Documents are visited in snapshot order, analyzers in slice order. An
/// [`AnalysisError`] abandons the rest of that document and the loop moves
/// on; it never aborts the run.
pub fn rewrite_documents<A, F>(
    snapshot: ProjectSnapshot,
    analyzers: &[A],
    fixers: &[F],
    progress: &dyn ProgressSink,
) -> RewriteOutcome
where
    A: Analyzer,
    F: CodeFix,
{
    let mut current = snapshot;
    let mut documents = Vec::new();

    for id in current.documents_of() {
        let Some(doc) = current.resolve_document(id) else {
            debug!(document = %id, "document removed; skipping");
            continue;
        };
        let path = doc.path;
        progress.emit(ProgressEvent::DocumentStarted { path: path.clone() });

        let mut outcome = DocumentOutcome {
            path: path.to_string(),
            passes: Vec::new(),
            error: None,
        };
        for analyzer in analyzers {
            let Some(fixer) = resolve_fixer(analyzer, fixers) else {
                progress.emit(ProgressEvent::AnalyzerSkipped {
                    analyzer: analyzer.name().to_string(),
                });
                outcome.passes.push(PassOutcome::skipped(analyzer.name()));
                continue;
            };
            match run_pass(analyzer, fixer, id, &path, &mut current, progress) {
                Ok(pass) => {
                    progress.emit(ProgressEvent::PassFinished {
                        path: path.clone(),
                        outcome: pass.clone(),
                    });
                    outcome.passes.push(pass);
                }
                Err(err) => {
                    progress.emit(ProgressEvent::DocumentAbandoned {
                        path: path.clone(),
                        error: err.to_string(),
                    });
                    outcome.error = Some(err.to_string());
                    break;
                }
            }
        }
        documents.push(outcome);
    }

    RewriteOutcome {
        snapshot: current,
        documents,
    }
}

/// One analyzer over one document. `current` is replaced after every
/// successful fix.
pub fn run_pass<A, F>(
    analyzer: &A,
    fixer: &F,
    id: DocumentId,
    path: &Utf8Path,
    current: &mut ProjectSnapshot,
    progress: &dyn ProgressSink,
) -> Result<PassOutcome, AnalysisError>
where
    A: Analyzer + ?Sized,
    F: CodeFix + ?Sized,
{
    let mut pass = PassOutcome {
        analyzer: analyzer.name().to_string(),
        initial: 0,
        applied: 0,
        remaining: 0,
        stop: StopReason::Converged,
    };
    let Some(mut doc) = current.resolve_document(id) else {
        return Ok(pass);
    };

    let mut diagnostics = diagnostics_for(analyzer, &doc, current)?;
    pass.initial = diagnostics.len() as u64;
    let mut budget = diagnostics.len();

    pass.stop = loop {
        let Some(first) = diagnostics.first() else {
            break StopReason::Converged;
        };
        if budget == 0 {
            break StopReason::BudgetExhausted;
        }

        let mut ctx = FixContext::new(&doc, first);
        fixer.register_code_fixes(&mut ctx);
        let Some(action) = ctx.into_actions().into_iter().next() else {
            break StopReason::NoActionOffered;
        };

        match action.apply(current) {
            Ok(next) => *current = next,
            Err(err) => {
                progress.emit(ProgressEvent::FixFailed {
                    path: path.to_path_buf(),
                    analyzer: pass.analyzer.clone(),
                    error: err.to_string(),
                });
                break StopReason::FixFailed;
            }
        }
        budget -= 1;
        pass.applied += 1;
        progress.emit(ProgressEvent::FixApplied {
            path: path.to_path_buf(),
            analyzer: pass.analyzer.clone(),
            title: action.title,
        });

        let Some(updated) = current.resolve_document(id) else {
            diagnostics.clear();
            break StopReason::Converged;
        };
        doc = updated;
        diagnostics = diagnostics_for(analyzer, &doc, current)?;
    };

    pass.remaining = diagnostics.len() as u64;
    debug!(
        analyzer = %pass.analyzer,
        document = %path,
        initial = pass.initial,
        applied = pass.applied,
        remaining = pass.remaining,
        "pass stopped: {:?}",
        pass.stop
    );
    Ok(pass)
}
