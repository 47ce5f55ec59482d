use pretty_assertions::assert_eq;
use winui_migrate_types::report::{
    CommitStatus, DocumentOutcome, MigrationReport, PassOutcome, ProjectReport, RunInfo,
    StopReason, ToolInfo,
};

fn tool() -> ToolInfo {
    ToolInfo {
        name: "winui-migrate".to_string(),
        version: Some("0.0.0".to_string()),
    }
}

fn pass(applied: u64, stop: StopReason) -> PassOutcome {
    PassOutcome {
        analyzer: "UWPStructAnalyzer".to_string(),
        initial: applied,
        applied,
        remaining: 0,
        stop,
    }
}

#[test]
fn stop_reason_serializes_snake_case() {
    let v = serde_json::to_value(StopReason::NoActionOffered).expect("serialize");
    assert_eq!(v, serde_json::json!("no_action_offered"));
    let v = serde_json::to_value(StopReason::BudgetExhausted).expect("serialize");
    assert_eq!(v, serde_json::json!("budget_exhausted"));
}

#[test]
fn report_schema_is_v1() {
    let report = MigrationReport::new(tool(), RunInfo::start(false));
    assert_eq!(report.schema, "winui-migrate.report.v1");
    assert!(report.succeeded());
}

#[test]
fn push_project_accumulates_summary() {
    let mut report = MigrationReport::new(tool(), RunInfo::start(true));
    report.push_project(ProjectReport {
        path: "App/App.csproj".to_string(),
        status: CommitStatus::Committed,
        documents: vec![
            DocumentOutcome {
                path: "App/MainPage.xaml.cs".to_string(),
                passes: vec![pass(3, StopReason::Converged), pass(1, StopReason::Converged)],
                error: None,
            },
            DocumentOutcome {
                path: "App/Broken.cs".to_string(),
                passes: vec![],
                error: Some("unterminated string literal".to_string()),
            },
        ],
        project_file_ops: vec![],
        files_written: Some(1),
        errors: vec![],
    });
    report.push_project(ProjectReport {
        path: "Lib/Lib.csproj".to_string(),
        status: CommitStatus::Failed,
        documents: vec![],
        project_file_ops: vec![],
        files_written: None,
        errors: vec!["commit failed".to_string()],
    });

    assert_eq!(report.summary.projects, 2);
    assert_eq!(report.summary.projects_failed, 1);
    assert_eq!(report.summary.documents, 2);
    assert_eq!(report.summary.documents_failed, 1);
    assert_eq!(report.summary.fixes_applied, 4);
    assert!(!report.succeeded());
}

#[test]
fn project_report_omits_empty_optional_fields() {
    let project = ProjectReport {
        path: "App.csproj".to_string(),
        status: CommitStatus::Unchanged,
        documents: vec![],
        project_file_ops: vec![],
        files_written: None,
        errors: vec![],
    };
    let value = serde_json::to_value(&project).expect("serialize");
    assert!(value.get("errors").is_none());
    assert!(value.get("project_file_ops").is_none());
    assert!(value.get("files_written").is_none());
    assert_eq!(value["status"], serde_json::json!("unchanged"));
}
