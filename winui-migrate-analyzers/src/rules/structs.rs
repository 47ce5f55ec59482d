use super::{Analyzer, CodeFix, ids};
use crate::action::{FixAction, FixContext, TextEdit};
use crate::compilation::Compilation;
use crate::error::AnalysisError;
use crate::syntax;
use winui_migrate_types::{Diagnostic, DiagnosticId, Severity, TextSpan};
use winui_migrate_workspace::SymbolKind;

const UWP_XAML: &str = "Windows.UI.Xaml";

/// `(struct, helper class, [(argument count, factory)])`
const HELPERS: &[(&str, &str, &[(usize, &str)])] = &[
    (
        "Thickness",
        "ThicknessHelper",
        &[(1, "FromUniformLength"), (4, "FromLengths")],
    ),
    (
        "CornerRadius",
        "CornerRadiusHelper",
        &[(1, "FromUniformRadius"), (4, "FromRadii")],
    ),
    (
        "GridLength",
        "GridLengthHelper",
        &[(1, "FromPixels"), (2, "FromValueAndType")],
    ),
    ("Duration", "DurationHelper", &[(1, "FromTimeSpan")]),
];

fn helper_for(name: &str) -> Option<(&'static str, &'static [(usize, &'static str)])> {
    HELPERS
        .iter()
        .find(|(ty, _, _)| *ty == name)
        .map(|&(_, helper, factories)| (helper, factories))
}

/// Flags constructor calls on XAML structs that WinUI 3 no longer lets C#
/// construct directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UwpStructAnalyzer;

impl UwpStructAnalyzer {
    pub const ID: &'static str = "UWP001";
    const NAME: &'static str = "UWPStructAnalyzer";
}

impl Analyzer for UwpStructAnalyzer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supported_diagnostics(&self) -> Vec<DiagnosticId> {
        ids(Self::ID)
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut out = Vec::new();
        for doc in compilation.documents() {
            let src = doc.src();
            for name in syntax::dotted_names(src, &doc.tokens) {
                let first = name.segments[0];
                let after_new = first > 0 && doc.tokens[first - 1].is_ident(src, "new");
                let open = doc.tokens.get(name.next_token());
                let Some(open) = open.filter(|t| t.is_punct(src, '(')) else {
                    continue;
                };
                if !after_new {
                    continue;
                }

                let text = name.text(src, &doc.tokens);
                let symbol = if name.is_qualified() {
                    compilation.resolve_qualified(&text)
                } else {
                    compilation.resolve_type(doc, &text)
                };
                let Some(symbol) = symbol else { continue };
                if symbol.kind != SymbolKind::Struct
                    || symbol.namespace != UWP_XAML
                    || helper_for(&symbol.name).is_none()
                {
                    continue;
                }

                let new_token = doc.tokens[first - 1];
                out.push(Diagnostic::in_source(
                    DiagnosticId::new(Self::ID),
                    Severity::Warning,
                    doc.id,
                    TextSpan::new(new_token.span.start, open.span.end),
                    format!(
                        "'{}' cannot be constructed in WinUI 3; use its helper class",
                        symbol.qualified_name()
                    ),
                ));
            }
        }
        Ok(out)
    }
}

/// Rewrites `new T(` into the matching `THelper.FromX(` factory call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UwpStructCodeFix;

impl CodeFix for UwpStructCodeFix {
    fn name(&self) -> &str {
        "UWPStructCodeFix"
    }

    fn fixable_diagnostic_ids(&self) -> Vec<DiagnosticId> {
        ids(UwpStructAnalyzer::ID)
    }

    fn register_code_fixes(&self, ctx: &mut FixContext<'_>) {
        let Some(span) = ctx.span() else { return };
        let text = ctx.text();
        let Ok(tokens) = syntax::tokenize(text) else { return };
        let Some(open) = tokens
            .iter()
            .position(|t| t.span.end == span.end && t.is_punct(text, '('))
        else {
            return;
        };
        let Some(args) = syntax::argument_count(text, &tokens, open) else {
            return;
        };

        // `new` Ident (. Ident)* `(`
        let path: Vec<&str> = tokens
            .iter()
            .filter(|t| t.span.start >= span.start && t.span.end < span.end)
            .skip(1)
            .filter(|t| t.kind == syntax::TokenKind::Ident)
            .map(|t| t.text(text))
            .collect();
        let Some((type_name, qualifier)) = path.split_last() else {
            return;
        };
        let Some((helper, factories)) = helper_for(type_name) else {
            return;
        };
        let Some(&(_, factory)) = factories.iter().find(|(n, _)| *n == args) else {
            tracing::debug!(type_name, args, "no helper factory for this arity");
            return;
        };

        let mut replacement = String::new();
        for part in qualifier {
            replacement.push_str(part);
            replacement.push('.');
        }
        replacement.push_str(&format!("{helper}.{factory}("));

        let Some(edit) = TextEdit::replace(text, span, replacement) else {
            return;
        };
        let document = ctx.document.id;
        ctx.register(FixAction {
            title: format!("Use {helper}.{factory}"),
            equivalence_key: format!("{}:{helper}.{factory}", UwpStructAnalyzer::ID),
            document,
            edits: vec![edit],
        });
    }
}
