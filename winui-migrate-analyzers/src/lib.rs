//! Migration analyzers and code fixes.
//!
//! An [`Analyzer`] reads a [`Compilation`] built from a project snapshot and
//! reports diagnostics; a [`CodeFix`] turns one diagnostic into zero or more
//! [`FixAction`]s. Applying an action yields a new snapshot and never
//! touches disk.

mod action;
mod compilation;
mod error;
mod metadata;
mod producer;
mod resolver;
mod rules;
pub mod syntax;

pub use action::{FixAction, FixContext, TextEdit};
pub use compilation::{Compilation, SyntaxDocument};
pub use error::{AnalysisError, FixApplicationError};
pub use metadata::{CORLIB, UWP_WINMD, WINUI, framework_references};
pub use producer::{diagnostics_for, retain_for_document};
pub use resolver::resolve_fixer;
pub use rules::{
    Analyzer, BuiltinAnalyzer, BuiltinCodeFix, CodeFix, EventArgsAnalyzer, EventArgsCodeFix,
    NamespaceAnalyzer, NamespaceCodeFix, UwpProjectionAnalyzer, UwpProjectionCodeFix,
    UwpStructAnalyzer, UwpStructCodeFix, builtin_analyzers, builtin_code_fixes,
};
