use crate::error::{ConfigurationError, LoadError, RootElementError};
use crate::root_element::ProjectRootElement;
use crate::solution::parse_solution;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceKind {
    #[default]
    Project,
    Solution,
}

impl WorkspaceKind {
    /// Guess the kind from a path's extension (`.sln` means solution).
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("sln") => WorkspaceKind::Solution,
            _ => WorkspaceKind::Project,
        }
    }
}

/// The set of project files a run will migrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationWorkspace {
    pub project_paths: Vec<Utf8PathBuf>,
    pub no_backup: bool,
}

#[derive(Debug, Clone)]
pub struct WorkspaceLoader {
    workspace_path: Utf8PathBuf,
    kind: WorkspaceKind,
}

impl WorkspaceLoader {
    /// Validate the input path before anything else happens.
    pub fn new(workspace_path: &Utf8Path, kind: WorkspaceKind) -> Result<Self, ConfigurationError> {
        if workspace_path.as_str().trim().is_empty() {
            return Err(ConfigurationError::EmptyPath);
        }
        if !workspace_path.is_file() {
            return Err(ConfigurationError::NotFound {
                path: workspace_path.to_path_buf(),
            });
        }
        Ok(Self {
            workspace_path: workspace_path.to_path_buf(),
            kind,
        })
    }

    pub fn kind(&self) -> WorkspaceKind {
        self.kind
    }

    pub fn load(&self, no_backup: bool) -> Result<MigrationWorkspace, LoadError> {
        let project_paths = match self.kind {
            WorkspaceKind::Project => vec![self.workspace_path.clone()],
            WorkspaceKind::Solution => parse_solution(&self.workspace_path)?.projects,
        };
        info!(
            workspace = %self.workspace_path,
            projects = project_paths.len(),
            "workspace loaded"
        );
        Ok(MigrationWorkspace {
            project_paths,
            no_backup,
        })
    }

    /// Formatting-preserving root element of a project file.
    pub fn root_element(&self, project_path: &Utf8Path) -> Result<ProjectRootElement, RootElementError> {
        ProjectRootElement::open(project_path)
    }
}
