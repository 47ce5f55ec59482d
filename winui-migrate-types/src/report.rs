use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub dry_run: bool,
}

impl RunInfo {
    pub fn start(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            dry_run,
        }
    }

    pub fn finish(&mut self) {
        self.ended_at = Some(Utc::now());
    }
}

/// Why one analyzer pass over one document stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No registered fixer handles this analyzer's diagnostics.
    NoFixer,
    /// Diagnostics were (or became) empty.
    Converged,
    /// The fixer offered no action for the first diagnostic.
    NoActionOffered,
    /// The attempt budget ran out before diagnostics cleared.
    BudgetExhausted,
    /// Applying the offered action failed; the pre-fix state was kept.
    FixFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassOutcome {
    pub analyzer: String,
    /// Diagnostics seen on the first computation; also the attempt budget.
    pub initial: u64,
    /// Fix actions applied successfully.
    pub applied: u64,
    /// Diagnostics still present when the pass stopped (best known count).
    pub remaining: u64,
    pub stop: StopReason,
}

impl PassOutcome {
    pub fn skipped(analyzer: impl Into<String>) -> Self {
        Self {
            analyzer: analyzer.into(),
            initial: 0,
            applied: 0,
            remaining: 0,
            stop: StopReason::NoFixer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub path: String,

    #[serde(default)]
    pub passes: Vec<PassOutcome>,

    /// Set when analysis failed and the remaining passes were abandoned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentOutcome {
    pub fn fixes_applied(&self) -> u64 {
        self.passes.iter().map(|p| p.applied).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStatus {
    Committed,
    Unchanged,
    Previewed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectReport {
    pub path: String,
    pub status: CommitStatus,

    #[serde(default)]
    pub documents: Vec<DocumentOutcome>,

    /// Human-readable descriptions of project-file edits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_file_ops: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_written: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub projects: u64,
    pub projects_failed: u64,
    pub documents: u64,
    pub documents_failed: u64,
    pub fixes_applied: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,

    #[serde(default)]
    pub projects: Vec<ProjectReport>,

    pub summary: ReportSummary,
}

impl MigrationReport {
    pub fn new(tool: ToolInfo, run: RunInfo) -> Self {
        Self {
            schema: crate::schema::WINUI_MIGRATE_REPORT_V1.to_string(),
            tool,
            run,
            projects: vec![],
            summary: ReportSummary::default(),
        }
    }

    pub fn push_project(&mut self, project: ProjectReport) {
        self.summary.projects += 1;
        if project.status == CommitStatus::Failed {
            self.summary.projects_failed += 1;
        }
        for doc in &project.documents {
            self.summary.documents += 1;
            if doc.error.is_some() {
                self.summary.documents_failed += 1;
            }
            self.summary.fixes_applied += doc.fixes_applied();
        }
        self.projects.push(project);
    }

    /// Binary overall result: every project committed (or had nothing to do).
    pub fn succeeded(&self) -> bool {
        self.summary.projects_failed == 0
    }
}
