use super::{Analyzer, CodeFix, ids};
use crate::action::{FixAction, FixContext, TextEdit};
use crate::compilation::Compilation;
use crate::error::AnalysisError;
use crate::syntax;
use winui_migrate_types::{Diagnostic, DiagnosticId, Severity, TextSpan};

/// Namespace roots that moved from `Windows.` to `Microsoft.`.
const MOVED_ROOTS: &[&[&str]] = &[&["Windows", "UI", "Xaml"], &["Windows", "UI", "Composition"]];

/// Flags qualified names and using directives under the UWP XAML and
/// composition namespaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamespaceAnalyzer;

impl NamespaceAnalyzer {
    pub const ID: &'static str = "ConvertNamespace";
}

impl Analyzer for NamespaceAnalyzer {
    fn name(&self) -> &str {
        "NamespaceAnalyzer"
    }

    fn supported_diagnostics(&self) -> Vec<DiagnosticId> {
        ids(Self::ID)
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut out = Vec::new();
        for doc in compilation.documents() {
            let src = doc.src();
            for name in syntax::dotted_names(src, &doc.tokens) {
                let segments: Vec<&str> =
                    name.segments.iter().map(|&i| doc.tokens[i].text(src)).collect();
                let moved = MOVED_ROOTS
                    .iter()
                    .any(|root| segments.len() >= root.len() && segments[..root.len()] == **root);
                if !moved {
                    continue;
                }
                out.push(Diagnostic::in_source(
                    DiagnosticId::new(Self::ID),
                    Severity::Warning,
                    doc.id,
                    name.span,
                    format!(
                        "'{}' moved to the Microsoft namespace in WinUI 3",
                        segments.join(".")
                    ),
                ));
            }
        }
        Ok(out)
    }
}

/// Replaces the leading `Windows` of a flagged name with `Microsoft`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamespaceCodeFix;

impl CodeFix for NamespaceCodeFix {
    fn name(&self) -> &str {
        "NamespaceCodeFix"
    }

    fn fixable_diagnostic_ids(&self) -> Vec<DiagnosticId> {
        ids(NamespaceAnalyzer::ID)
    }

    fn register_code_fixes(&self, ctx: &mut FixContext<'_>) {
        let Some(span) = ctx.span() else { return };
        let head = TextSpan::new(span.start, span.start + "Windows".len());
        if ctx.text().get(head.start..head.end) != Some("Windows") {
            return;
        }
        let Some(edit) = TextEdit::replace(ctx.text(), head, "Microsoft") else {
            return;
        };
        let document = ctx.document.id;
        ctx.register(FixAction {
            title: "Convert namespace to Microsoft.*".to_string(),
            equivalence_key: NamespaceAnalyzer::ID.to_string(),
            document,
            edits: vec![edit],
        });
    }
}
