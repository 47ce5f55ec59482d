//! The migration pipeline, extracted from the CLI.
//!
//! Everything the user sees while it runs goes through the
//! [`ProgressSink`] port; the caller decides where the report and the
//! patch end up.

use crate::error::MigrationError;
use crate::manifest::{apply_project_conversion, plan_project_conversion};
use crate::ports::{ProgressEvent, ProgressSink};
use crate::rewrite::rewrite_documents;
use crate::settings::MigrationSettings;
use camino::Utf8Path;
use tracing::{debug, info};
use winui_migrate_analyzers::{builtin_analyzers, builtin_code_fixes, framework_references};
use winui_migrate_types::report::{
    CommitStatus, MigrationReport, ProjectReport, RunInfo, ToolInfo,
};
use winui_migrate_workspace::{
    CommitOptions, ProjectRootElement, ProjectSnapshot, ProjectWorkspace, RootElementError,
    WorkspaceLoader,
};

/// Outcome of `run_migration`.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub report: MigrationReport,
    /// Unified diff of every change; filled on dry runs only.
    pub patch: String,
}

impl MigrationOutcome {
    pub fn succeeded(&self) -> bool {
        self.report.succeeded()
    }

    /// The error a caller should exit with once the report is written.
    pub fn commit_error(&self) -> Option<MigrationError> {
        (!self.succeeded()).then(|| MigrationError::CommitFailed {
            failed: self.report.summary.projects_failed,
            total: self.report.summary.projects,
        })
    }
}

/// Migrate every project of the configured workspace.
///
/// Setup failures (bad path, unreadable project) return an error straight
/// away. A project that fails to commit is recorded in the report and the
/// run carries on; see [`MigrationOutcome::commit_error`].
pub fn run_migration(
    settings: &MigrationSettings,
    progress: &dyn ProgressSink,
    tool: ToolInfo,
) -> Result<MigrationOutcome, MigrationError> {
    let loader = WorkspaceLoader::new(&settings.path, settings.kind)?;
    let workspace = loader.load(settings.no_backup)?;

    let options = CommitOptions {
        backup_enabled: !workspace.no_backup,
        backup_suffix: settings.backup_suffix.clone(),
    };
    let mut report = MigrationReport::new(tool, RunInfo::start(settings.dry_run));
    let mut patch = String::new();

    for project_path in &workspace.project_paths {
        progress.emit(ProgressEvent::ProjectStarted {
            path: project_path.clone(),
        });
        let mut project = ProjectWorkspace::open(project_path, options.clone())?;
        let (project_report, project_patch) =
            migrate_project(settings, &mut project, progress);
        patch.push_str(&project_patch);

        match project_report.status {
            CommitStatus::Failed => progress.emit(ProgressEvent::ProjectFailed {
                path: project_path.clone(),
                error: project_report.errors.join("; "),
            }),
            status => progress.emit(ProgressEvent::ProjectFinished {
                path: project_path.clone(),
                status,
                files_written: project_report.files_written.unwrap_or(0),
            }),
        }
        report.push_project(project_report);
    }
    report.run.finish();

    info!(
        projects = report.summary.projects,
        failed = report.summary.projects_failed,
        fixes = report.summary.fixes_applied,
        dry_run = settings.dry_run,
        "migration finished"
    );

    Ok(MigrationOutcome { report, patch })
}

/// Rewrite one project, convert its project file, then commit or preview.
fn migrate_project(
    settings: &MigrationSettings,
    project: &mut ProjectWorkspace,
    progress: &dyn ProgressSink,
) -> (ProjectReport, String) {
    let base = project.current_snapshot().clone();
    let references = framework_references();
    let with_references = base.add_auxiliary_inputs(&references);

    let analyzers = builtin_analyzers();
    let fixers = builtin_code_fixes();
    let rewritten = rewrite_documents(with_references, &analyzers, &fixers, progress);

    let mut report = ProjectReport {
        path: base.path().to_string(),
        status: CommitStatus::Unchanged,
        documents: rewritten.documents,
        project_file_ops: Vec::new(),
        files_written: None,
        errors: Vec::new(),
    };

    let mut snapshot = rewritten.snapshot;
    if !settings.skip_project_file {
        match convert_project_file(settings, &snapshot, progress) {
            Ok(Some((text, ops))) => {
                snapshot = snapshot.with_project_text(text);
                report.project_file_ops = ops;
            }
            Ok(None) => {}
            Err(err) => report.errors.push(err.to_string()),
        }
    }
    let final_snapshot = snapshot.remove_auxiliary_inputs(&references);

    if settings.dry_run {
        match project.preview_patch(&final_snapshot) {
            Ok(patch) => {
                report.status = if patch.is_empty() {
                    CommitStatus::Unchanged
                } else {
                    CommitStatus::Previewed
                };
                return (report, patch);
            }
            Err(err) => {
                report.status = CommitStatus::Failed;
                report.errors.push(err.to_string());
                return (report, String::new());
            }
        }
    }

    match project.try_apply_changes(&final_snapshot) {
        Ok(summary) => {
            report.status = if summary.files_written.is_empty() {
                CommitStatus::Unchanged
            } else {
                CommitStatus::Committed
            };
            report.files_written = Some(summary.files_written.len() as u64);
            debug!(
                project = %final_snapshot.path(),
                written = summary.files_written.len(),
                backups = summary.backups.len(),
                "project committed"
            );
        }
        Err(err) => {
            report.status = CommitStatus::Failed;
            report.errors.push(err.to_string());
        }
    }
    (report, String::new())
}

/// Returns the converted project text and op descriptions, or `None` when
/// the project file needs no edits.
fn convert_project_file(
    settings: &MigrationSettings,
    snapshot: &ProjectSnapshot,
    progress: &dyn ProgressSink,
) -> Result<Option<(String, Vec<String>)>, RootElementError> {
    let path: &Utf8Path = snapshot.path();
    let mut root = ProjectRootElement::parse(path, snapshot.project_text())?;
    let ops = plan_project_conversion(&root, &settings.facts);
    if ops.is_empty() {
        return Ok(None);
    }
    apply_project_conversion(&mut root, &ops)?;

    let described: Vec<String> = ops.iter().map(ToString::to_string).collect();
    for operation in &described {
        progress.emit(ProgressEvent::ProjectFileEdited {
            path: path.to_path_buf(),
            operation: operation.clone(),
        });
    }
    Ok(Some((root.into_text(), described)))
}
