//! Per-document diagnostic production.

use crate::compilation::Compilation;
use crate::error::AnalysisError;
use crate::rules::Analyzer;
use winui_migrate_types::{Diagnostic, DocumentId, Location};
use winui_migrate_workspace::{Document, ProjectSnapshot};

/// Diagnostics `analyzer` reports for `document`, ordered by source offset.
///
/// The compilation is built from `snapshot` on every call, so the result
/// always reflects the snapshot's current text and auxiliary inputs.
pub fn diagnostics_for<A>(
    analyzer: &A,
    document: &Document,
    snapshot: &ProjectSnapshot,
) -> Result<Vec<Diagnostic>, AnalysisError>
where
    A: Analyzer + ?Sized,
{
    let compilation = Compilation::build(snapshot)?;
    let raw = analyzer.analyze(&compilation)?;
    let kept = retain_for_document(raw, document.id);
    tracing::debug!(
        analyzer = analyzer.name(),
        document = %document.path,
        count = kept.len(),
        "diagnostics produced"
    );
    Ok(kept)
}

/// Keep diagnostics with no location, a metadata location, or a source
/// location in `document`; then stable-sort by offset.
pub fn retain_for_document(raw: Vec<Diagnostic>, document: DocumentId) -> Vec<Diagnostic> {
    let mut kept: Vec<Diagnostic> = raw
        .into_iter()
        .filter(|d| match &d.location {
            Location::None | Location::Metadata { .. } => true,
            Location::Source { document: at, .. } => *at == document,
        })
        .collect();
    kept.sort_by_key(Diagnostic::offset);
    kept
}
