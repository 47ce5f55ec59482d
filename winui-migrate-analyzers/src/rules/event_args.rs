use super::{Analyzer, CodeFix, ids, type_references};
use crate::action::{FixAction, FixContext, TextEdit};
use crate::compilation::Compilation;
use crate::error::AnalysisError;
use winui_migrate_types::{Diagnostic, DiagnosticId, Severity};

const UWP_LAUNCH_ARGS: &str = "Windows.ApplicationModel.Activation.LaunchActivatedEventArgs";
const WINUI_LAUNCH_ARGS: &str = "Microsoft.UI.Xaml.LaunchActivatedEventArgs";

/// `OnLaunched` receives `Microsoft.UI.Xaml.LaunchActivatedEventArgs` in
/// WinUI 3; flags uses of the UWP activation type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventArgsAnalyzer;

impl EventArgsAnalyzer {
    pub const ID: &'static str = "UWP003";
}

impl Analyzer for EventArgsAnalyzer {
    fn name(&self) -> &str {
        "EventArgsAnalyzer"
    }

    fn supported_diagnostics(&self) -> Vec<DiagnosticId> {
        ids(Self::ID)
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut out = Vec::new();
        for doc in compilation.documents() {
            for found in type_references(compilation, doc, |q| q == UWP_LAUNCH_ARGS) {
                out.push(Diagnostic::in_source(
                    DiagnosticId::new(Self::ID),
                    Severity::Warning,
                    doc.id,
                    found.span,
                    format!("'{UWP_LAUNCH_ARGS}' is replaced by '{WINUI_LAUNCH_ARGS}'"),
                ));
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventArgsCodeFix;

impl CodeFix for EventArgsCodeFix {
    fn name(&self) -> &str {
        "EventArgsCodeFix"
    }

    fn fixable_diagnostic_ids(&self) -> Vec<DiagnosticId> {
        ids(EventArgsAnalyzer::ID)
    }

    fn register_code_fixes(&self, ctx: &mut FixContext<'_>) {
        let Some(span) = ctx.span() else { return };
        let Some(edit) = TextEdit::replace(ctx.text(), span, WINUI_LAUNCH_ARGS) else {
            return;
        };
        let document = ctx.document.id;
        ctx.register(FixAction {
            title: format!("Use {WINUI_LAUNCH_ARGS}"),
            equivalence_key: EventArgsAnalyzer::ID.to_string(),
            document,
            edits: vec![edit],
        });
    }
}
