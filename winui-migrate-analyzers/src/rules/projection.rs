use super::{Analyzer, CodeFix, ids, type_references};
use crate::action::{FixAction, FixContext, TextEdit};
use crate::compilation::Compilation;
use crate::error::AnalysisError;
use winui_migrate_types::{Diagnostic, DiagnosticId, Severity};

/// WinRT interop types and the .NET types that replace them.
const PROJECTIONS: &[(&str, &str)] = &[
    (
        "Windows.UI.Xaml.Data.INotifyPropertyChanged",
        "System.ComponentModel.INotifyPropertyChanged",
    ),
    (
        "Windows.UI.Xaml.Data.PropertyChangedEventArgs",
        "System.ComponentModel.PropertyChangedEventArgs",
    ),
    (
        "Windows.UI.Xaml.Data.PropertyChangedEventHandler",
        "System.ComponentModel.PropertyChangedEventHandler",
    ),
    ("Windows.UI.Xaml.Input.ICommand", "System.Windows.Input.ICommand"),
    (
        "Windows.UI.Xaml.Interop.INotifyCollectionChanged",
        "System.Collections.Specialized.INotifyCollectionChanged",
    ),
    (
        "Windows.UI.Xaml.Interop.NotifyCollectionChangedEventArgs",
        "System.Collections.Specialized.NotifyCollectionChangedEventArgs",
    ),
    (
        "Windows.UI.Xaml.Interop.NotifyCollectionChangedEventHandler",
        "System.Collections.Specialized.NotifyCollectionChangedEventHandler",
    ),
    (
        "Windows.UI.Xaml.Interop.NotifyCollectionChangedAction",
        "System.Collections.Specialized.NotifyCollectionChangedAction",
    ),
    (
        "Windows.UI.Xaml.Interop.IBindableIterable",
        "System.Collections.IEnumerable",
    ),
];

fn projection_of(qualified: &str) -> Option<&'static str> {
    PROJECTIONS
        .iter()
        .find(|(from, _)| *from == qualified)
        .map(|&(_, to)| to)
}

/// Matches either a full name or, for simple names, the last segment.
fn projection_for_reference(text: &str) -> Option<(&'static str, &'static str)> {
    PROJECTIONS.iter().copied().find(|(from, _)| {
        *from == text || (!text.contains('.') && from.rsplit('.').next() == Some(text))
    })
}

/// Flags references to WinRT interop types that .NET 5 projects natively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UwpProjectionAnalyzer;

impl UwpProjectionAnalyzer {
    pub const ID: &'static str = "UWP002";
}

impl Analyzer for UwpProjectionAnalyzer {
    fn name(&self) -> &str {
        "UWPProjectionAnalyzer"
    }

    fn supported_diagnostics(&self) -> Vec<DiagnosticId> {
        ids(Self::ID)
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut out = Vec::new();
        for doc in compilation.documents() {
            for found in type_references(compilation, doc, |q| projection_of(q).is_some()) {
                let target = projection_of(&found.qualified).unwrap_or_default();
                out.push(Diagnostic::in_source(
                    DiagnosticId::new(Self::ID),
                    Severity::Warning,
                    doc.id,
                    found.span,
                    format!("'{}' is projected as '{}' in .NET 5", found.qualified, target),
                ));
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UwpProjectionCodeFix;

impl CodeFix for UwpProjectionCodeFix {
    fn name(&self) -> &str {
        "UWPProjectionCodeFix"
    }

    fn fixable_diagnostic_ids(&self) -> Vec<DiagnosticId> {
        ids(UwpProjectionAnalyzer::ID)
    }

    fn register_code_fixes(&self, ctx: &mut FixContext<'_>) {
        let Some(span) = ctx.span() else { return };
        let Some(current) = ctx.text().get(span.start..span.end) else {
            return;
        };
        let Some((from, to)) = projection_for_reference(current) else {
            return;
        };
        let Some(edit) = TextEdit::replace(ctx.text(), span, to) else {
            return;
        };
        let document = ctx.document.id;
        ctx.register(FixAction {
            title: format!("Replace with {to}"),
            equivalence_key: format!("{}:{from}", UwpProjectionAnalyzer::ID),
            document,
            edits: vec![edit],
        });
    }
}
