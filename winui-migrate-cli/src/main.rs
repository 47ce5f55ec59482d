use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use fs_err as fs;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use winui_migrate_cli::config;
use winui_migrate_core::adapters::TracingProgress;
use winui_migrate_core::{MigrationError, MigrationSettings, run_migration};
use winui_migrate_types::report::ToolInfo;
use winui_migrate_workspace::WorkspaceKind;

#[derive(Debug, Parser)]
#[command(
    name = "winui-migrate",
    version,
    about = "Migrate UWP/WinUI2 C# projects toward WinUI3."
)]
struct Cli {
    /// Project (.csproj) or solution (.sln) to migrate.
    path: Utf8PathBuf,

    /// Treat the input as a project or a solution (default: from the extension).
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Do not keep backups of files that are replaced.
    #[arg(long, default_value_t = false)]
    no_backup: bool,

    /// Print the patch instead of writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Write the JSON run report to this file.
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Config file (default: winui-migrate.toml beside the input).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Leave the project file alone; only rewrite C# documents.
    #[arg(long, default_value_t = false)]
    skip_project_file: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum KindArg {
    Project,
    Solution,
}

impl From<KindArg> for WorkspaceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Project => WorkspaceKind::Project,
            KindArg::Solution => WorkspaceKind::Solution,
        }
    }
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            error!("{:?}", e);
            let code = e
                .downcast_ref::<MigrationError>()
                .map(MigrationError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cmd_migrate(cli)
}

fn cmd_migrate(cli: Cli) -> anyhow::Result<()> {
    let file_config = config::load_or_default(cli.config.as_deref(), &cli.path)
        .context("load winui-migrate.toml config")?;
    let merged = file_config.merge(cli.no_backup);
    debug!(
        "merged config: no_backup={}, backup_suffix={}",
        merged.no_backup, merged.backup_suffix
    );

    let settings = MigrationSettings {
        kind: cli
            .kind
            .map(WorkspaceKind::from)
            .unwrap_or_else(|| WorkspaceKind::from_path(&cli.path)),
        path: cli.path,
        dry_run: cli.dry_run,
        no_backup: merged.no_backup,
        backup_suffix: merged.backup_suffix,
        skip_project_file: cli.skip_project_file,
        facts: merged.facts,
    };

    let outcome = run_migration(&settings, &TracingProgress, tool_info())?;

    if let Some(path) = &cli.report {
        write_json(path, &outcome.report)?;
        info!("wrote report to {}", path);
    }
    if settings.dry_run {
        print!("{}", outcome.patch);
    }

    let summary = &outcome.report.summary;
    info!(
        "{} project(s), {} document(s), {} fix(es) applied{}",
        summary.projects,
        summary.documents,
        summary.fixes_applied,
        if settings.dry_run { " (dry-run)" } else { "" }
    );

    match outcome.commit_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "winui-migrate".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    fs::write(path, json).with_context(|| format!("write {}", path))?;
    Ok(())
}
