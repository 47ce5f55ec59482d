//! Fixer resolution determinism.

use proptest::prelude::*;
use winui_migrate_analyzers::{
    Analyzer, AnalysisError, CodeFix, Compilation, FixContext, builtin_analyzers,
    builtin_code_fixes, resolve_fixer,
};
use winui_migrate_types::{Diagnostic, DiagnosticId};

struct Reports(Vec<&'static str>);

impl Analyzer for Reports {
    fn name(&self) -> &str {
        "reports"
    }

    fn supported_diagnostics(&self) -> Vec<DiagnosticId> {
        self.0.iter().copied().map(DiagnosticId::new).collect()
    }

    fn analyze(&self, _: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, PartialEq)]
struct Fixes(usize, Vec<&'static str>);

impl CodeFix for Fixes {
    fn name(&self) -> &str {
        "fixes"
    }

    fn fixable_diagnostic_ids(&self) -> Vec<DiagnosticId> {
        self.1.iter().copied().map(DiagnosticId::new).collect()
    }

    fn register_code_fixes(&self, _: &mut FixContext<'_>) {}
}

#[test]
fn every_builtin_analyzer_has_its_own_fixer() {
    let fixers = builtin_code_fixes();
    for analyzer in builtin_analyzers() {
        let fixer = resolve_fixer(&analyzer, &fixers).expect("builtin fixer");
        assert_eq!(fixer.fixable_diagnostic_ids(), analyzer.supported_diagnostics());
    }
}

#[test]
fn no_intersection_means_no_fixer() {
    let fixers = vec![Fixes(0, vec!["B"]), Fixes(1, vec!["C"])];
    assert!(resolve_fixer(&Reports(vec!["A"]), &fixers).is_none());
    assert!(resolve_fixer(&Reports(vec![]), &fixers).is_none());
}

const IDS: &[&str] = &["A", "B", "C", "D"];

fn id_set() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(IDS.to_vec(), 0..=IDS.len())
}

proptest! {
    #[test]
    fn resolution_picks_first_matching_in_registration_order(
        supported in id_set(),
        fixable in prop::collection::vec(id_set(), 0..6),
    ) {
        let analyzer = Reports(supported.clone());
        let fixers: Vec<Fixes> = fixable
            .into_iter()
            .enumerate()
            .map(|(i, ids)| Fixes(i, ids))
            .collect();

        let expected = fixers
            .iter()
            .position(|f| f.1.iter().any(|id| supported.contains(id)));
        let first = resolve_fixer(&analyzer, &fixers).map(|f| f.0);
        let again = resolve_fixer(&analyzer, &fixers).map(|f| f.0);

        prop_assert_eq!(first, expected);
        prop_assert_eq!(first, again);
    }
}
