//! Project snapshot store and MSBuild plumbing.
//!
//! This crate owns *where* documents come from and *how* a final snapshot is
//! written back. It knows nothing about analyzers; that's the
//! `winui-migrate-analyzers` crate.

mod commit;
mod error;
mod loader;
mod project;
mod root_element;
mod snapshot;
mod solution;

pub use commit::{CommitOptions, CommitSummary, ProjectWorkspace};
pub use error::{ConfigurationError, LoadError, PersistenceError, RootElementError, SnapshotError};
pub use loader::{MigrationWorkspace, WorkspaceKind, WorkspaceLoader};
pub use project::ProjectLoader;
pub use root_element::{ElementNode, ImportElement, PackageReference, ProjectRootElement, PropertyElement};
pub use snapshot::{AuxiliaryInput, Document, MetadataSymbol, ProjectSnapshot, SymbolKind};
pub use solution::{SolutionEntry, SolutionProjectType, SolutionProjects, parse_solution};
