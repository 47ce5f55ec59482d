//! Shared DTOs (schemas-as-code) for the winui-migrate workspace.
//!
//! # Design constraints
//! - Diagnostics and reports are serialized into the run report.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod diagnostic;
pub mod ids;
pub mod report;

pub use diagnostic::{Diagnostic, DiagnosticId, Location, Severity, TextSpan};
pub use ids::{DocumentId, ProjectId};

/// Schema identifiers.
pub mod schema {
    pub const WINUI_MIGRATE_REPORT_V1: &str = "winui-migrate.report.v1";
}
