//! Embeddable core library for winui-migrate.
//!
//! Provides a clap-free entry point that a CLI or another host process can
//! drive. Progress is reported through the [`ProgressSink`](ports::ProgressSink)
//! port; [`adapters::TracingProgress`] is the default sink.
//!
//! # Entry points
//!
//! - [`run_migration`](pipeline::run_migration): load, rewrite, convert the
//!   project file, then commit (or preview) every project.
//! - [`rewrite_documents`](rewrite::rewrite_documents): the convergent
//!   analyzer/fixer loop over one snapshot, with no I/O.

pub mod adapters;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod ports;
pub mod rewrite;
pub mod settings;

pub use error::MigrationError;
pub use pipeline::{MigrationOutcome, run_migration};
pub use settings::MigrationSettings;
