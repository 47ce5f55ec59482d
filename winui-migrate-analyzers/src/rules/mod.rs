//! Analyzer and code fix contracts plus the built-in migration rules.

use crate::action::FixContext;
use crate::compilation::{Compilation, SyntaxDocument};
use crate::error::AnalysisError;
use crate::syntax;
use winui_migrate_types::{Diagnostic, DiagnosticId, TextSpan};

mod event_args;
mod namespace;
mod projection;
mod structs;

pub use event_args::{EventArgsAnalyzer, EventArgsCodeFix};
pub use namespace::{NamespaceAnalyzer, NamespaceCodeFix};
pub use projection::{UwpProjectionAnalyzer, UwpProjectionCodeFix};
pub use structs::{UwpStructAnalyzer, UwpStructCodeFix};

/// Produces diagnostics over a whole compilation.
pub trait Analyzer {
    fn name(&self) -> &str;

    fn supported_diagnostics(&self) -> Vec<DiagnosticId>;

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError>;
}

/// Offers fix actions for diagnostics it declares fixable.
pub trait CodeFix {
    fn name(&self) -> &str;

    fn fixable_diagnostic_ids(&self) -> Vec<DiagnosticId>;

    /// Register zero or more actions on `ctx`. Registering nothing means
    /// "no fix offered".
    fn register_code_fixes(&self, ctx: &mut FixContext<'_>);
}

/// The closed set of analyzers shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinAnalyzer {
    Struct(UwpStructAnalyzer),
    Projection(UwpProjectionAnalyzer),
    EventArgs(EventArgsAnalyzer),
    Namespace(NamespaceAnalyzer),
}

impl BuiltinAnalyzer {
    fn inner(&self) -> &dyn Analyzer {
        match self {
            Self::Struct(a) => a,
            Self::Projection(a) => a,
            Self::EventArgs(a) => a,
            Self::Namespace(a) => a,
        }
    }
}

impl Analyzer for BuiltinAnalyzer {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn supported_diagnostics(&self) -> Vec<DiagnosticId> {
        self.inner().supported_diagnostics()
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        self.inner().analyze(compilation)
    }
}

/// The closed set of code fixes shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCodeFix {
    EventArgs(EventArgsCodeFix),
    Namespace(NamespaceCodeFix),
    Struct(UwpStructCodeFix),
    Projection(UwpProjectionCodeFix),
}

impl BuiltinCodeFix {
    fn inner(&self) -> &dyn CodeFix {
        match self {
            Self::EventArgs(f) => f,
            Self::Namespace(f) => f,
            Self::Struct(f) => f,
            Self::Projection(f) => f,
        }
    }
}

impl CodeFix for BuiltinCodeFix {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn fixable_diagnostic_ids(&self) -> Vec<DiagnosticId> {
        self.inner().fixable_diagnostic_ids()
    }

    fn register_code_fixes(&self, ctx: &mut FixContext<'_>) {
        self.inner().register_code_fixes(ctx)
    }
}

/// Analyzers in the order they run against each document.
///
/// Struct construction is rewritten before namespaces change so that type
/// resolution still sees the UWP types.
pub fn builtin_analyzers() -> Vec<BuiltinAnalyzer> {
    vec![
        BuiltinAnalyzer::Struct(UwpStructAnalyzer),
        BuiltinAnalyzer::Projection(UwpProjectionAnalyzer),
        BuiltinAnalyzer::EventArgs(EventArgsAnalyzer),
        BuiltinAnalyzer::Namespace(NamespaceAnalyzer),
    ]
}

/// Code fixes in registration order.
pub fn builtin_code_fixes() -> Vec<BuiltinCodeFix> {
    vec![
        BuiltinCodeFix::EventArgs(EventArgsCodeFix),
        BuiltinCodeFix::Namespace(NamespaceCodeFix),
        BuiltinCodeFix::Struct(UwpStructCodeFix),
        BuiltinCodeFix::Projection(UwpProjectionCodeFix),
    ]
}

/// A reference to one of a rule's target types found in a document.
struct TypeReference {
    span: TextSpan,
    qualified: String,
}

/// Every reference in `doc` to a type whose fully qualified name satisfies
/// `wanted`. Qualified references match on their longest matching prefix
/// (so `A.B.T.Member` reports `A.B.T`); simple names go through import
/// resolution.
fn type_references(
    compilation: &Compilation,
    doc: &SyntaxDocument,
    wanted: impl Fn(&str) -> bool,
) -> Vec<TypeReference> {
    let src = doc.src();
    let mut out = Vec::new();
    for name in syntax::dotted_names(src, &doc.tokens) {
        let segments: Vec<&str> = name.segments.iter().map(|&i| doc.tokens[i].text(src)).collect();
        let qualified_match = (2..=segments.len()).rev().find_map(|n| {
            let candidate = segments[..n].join(".");
            wanted(&candidate).then(|| (n, candidate))
        });
        if let Some((n, qualified)) = qualified_match {
            let last = doc.tokens[name.segments[n - 1]];
            out.push(TypeReference {
                span: TextSpan::new(name.span.start, last.span.end),
                qualified,
            });
            continue;
        }
        let first = name.segments[0];
        let alias_declaration = first > 0 && doc.tokens[first - 1].is_ident(src, "using");
        if !alias_declaration
            && let Some(symbol) = compilation.resolve_type(doc, segments[0])
            && wanted(&symbol.qualified_name())
        {
            out.push(TypeReference {
                span: doc.tokens[first].span,
                qualified: symbol.qualified_name(),
            });
        }
    }
    out
}

fn ids(id: &str) -> Vec<DiagnosticId> {
    vec![DiagnosticId::new(id)]
}
