//! Analyzer-to-fixer pairing.

use crate::rules::{Analyzer, CodeFix};

/// First fixer, in registration order, that can fix any diagnostic id the
/// analyzer reports.
pub fn resolve_fixer<'f, A, F>(analyzer: &A, fixers: &'f [F]) -> Option<&'f F>
where
    A: Analyzer + ?Sized,
    F: CodeFix,
{
    let supported = analyzer.supported_diagnostics();
    fixers.iter().find(|fixer| {
        fixer
            .fixable_diagnostic_ids()
            .iter()
            .any(|id| supported.contains(id))
    })
}
