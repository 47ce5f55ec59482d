//! Clap-free settings for the migration pipeline.

use camino::Utf8PathBuf;
use winui_migrate_facts::FactTable;
use winui_migrate_workspace::WorkspaceKind;

#[derive(Debug, Clone)]
pub struct MigrationSettings {
    /// Project or solution file.
    pub path: Utf8PathBuf,
    pub kind: WorkspaceKind,

    // Persistence
    pub dry_run: bool,
    pub no_backup: bool,
    pub backup_suffix: String,

    // Project file
    pub skip_project_file: bool,
    pub facts: FactTable,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::new(),
            kind: WorkspaceKind::default(),
            dry_run: false,
            no_backup: false,
            backup_suffix: ".winui.bak".to_string(),
            skip_project_file: false,
            facts: FactTable::builtin(),
        }
    }
}
