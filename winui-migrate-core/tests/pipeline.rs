//! End-to-end pipeline runs against projects on disk.

use camino::{Utf8Path, Utf8PathBuf};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use winui_migrate_core::adapters::TracingProgress;
use winui_migrate_core::{MigrationError, MigrationSettings, run_migration};
use winui_migrate_facts::{FactTable, FactsConfig};
use winui_migrate_types::report::{CommitStatus, ToolInfo};
use winui_migrate_workspace::WorkspaceKind;

const PROJECT: &str = r#"<Project ToolsVersion="15.0">
  <PropertyGroup>
    <ProjectGuid>{6E1B7A4C-9F2D-4E55-8B0A-3C7D2E1F0A9B}</ProjectGuid>
    <OutputType>AppContainerExe</OutputType>
  </PropertyGroup>
  <ItemGroup>
    <Compile Include="App.xaml.cs" />
    <Compile Include="MainPage.xaml.cs" />
  </ItemGroup>
  <ItemGroup>
    <PackageReference Include="Microsoft.UI.Xaml" Version="2.8.6" />
  </ItemGroup>
</Project>
"#;

const APP: &str = r#"using Windows.ApplicationModel.Activation;
using Windows.UI.Xaml;

namespace Demo
{
    sealed partial class App : Application
    {
        protected override void OnLaunched(LaunchActivatedEventArgs e)
        {
        }
    }
}
"#;

const MAIN_PAGE: &str = r#"using Windows.UI.Xaml;
using Windows.UI.Xaml.Controls;

namespace Demo
{
    public sealed partial class MainPage : Page
    {
        void Layout()
        {
            Margin = new Thickness(12);
        }
    }
}
"#;

fn create_temp_project() -> (TempDir, Utf8PathBuf) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).expect("utf8");
    fs::write(root.join("App.csproj"), PROJECT).unwrap();
    fs::write(root.join("App.xaml.cs"), APP).unwrap();
    fs::write(root.join("MainPage.xaml.cs"), MAIN_PAGE).unwrap();
    (td, root)
}

fn settings(path: Utf8PathBuf) -> MigrationSettings {
    MigrationSettings {
        kind: WorkspaceKind::from_path(&path),
        path,
        ..MigrationSettings::default()
    }
}

fn tool() -> ToolInfo {
    ToolInfo {
        name: "winui-migrate".to_string(),
        version: Some("test".to_string()),
    }
}

fn read(root: &Utf8Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

#[test]
fn migration_rewrites_sources_and_project_file() {
    let (_td, root) = create_temp_project();
    let outcome =
        run_migration(&settings(root.join("App.csproj")), &TracingProgress, tool()).unwrap();

    assert!(outcome.succeeded());
    assert!(outcome.commit_error().is_none());
    assert!(outcome.patch.is_empty());
    let project = &outcome.report.projects[0];
    assert_eq!(project.status, CommitStatus::Committed);
    assert_eq!(project.files_written, Some(3));
    assert_eq!(
        project.project_file_ops,
        vec![
            "remove property ProjectGuid".to_string(),
            "convert package Microsoft.UI.Xaml -> Microsoft.WinUI".to_string(),
        ]
    );

    let app = read(&root, "App.xaml.cs");
    assert!(app.contains("using Microsoft.UI.Xaml;"));
    assert!(app.contains("using Windows.ApplicationModel.Activation;"));
    assert!(app.contains("OnLaunched(Microsoft.UI.Xaml.LaunchActivatedEventArgs e)"));

    let page = read(&root, "MainPage.xaml.cs");
    assert!(page.starts_with("using Microsoft.UI.Xaml;\nusing Microsoft.UI.Xaml.Controls;\n"));
    assert!(page.contains("Margin = ThicknessHelper.FromUniformLength(12);"));

    let csproj = read(&root, "App.csproj");
    assert!(!csproj.contains("ProjectGuid"));
    assert!(csproj.contains(r#"<PackageReference Include="Microsoft.WinUI" Version="2.8.6" />"#));
    assert!(csproj.contains("<OutputType>AppContainerExe</OutputType>"));

    assert_eq!(read(&root, "App.xaml.cs.winui.bak"), APP);
    assert_eq!(read(&root, "App.csproj.winui.bak"), PROJECT);
    assert_eq!(outcome.report.summary.documents, 2);
    assert_eq!(outcome.report.summary.fixes_applied, 5);
    assert!(outcome.report.run.ended_at.is_some());
}

#[test]
fn dry_run_previews_without_writing() {
    let (_td, root) = create_temp_project();
    let mut s = settings(root.join("App.csproj"));
    s.dry_run = true;
    let outcome = run_migration(&s, &TracingProgress, tool()).unwrap();

    assert_eq!(outcome.report.projects[0].status, CommitStatus::Previewed);
    assert_eq!(outcome.report.projects[0].files_written, None);
    assert!(outcome.patch.contains("-using Windows.UI.Xaml;"));
    assert!(outcome.patch.contains("+using Microsoft.UI.Xaml;"));
    assert!(outcome.patch.contains("App.csproj"));

    assert_eq!(read(&root, "App.xaml.cs"), APP);
    assert_eq!(read(&root, "MainPage.xaml.cs"), MAIN_PAGE);
    assert_eq!(read(&root, "App.csproj"), PROJECT);
    assert!(!root.join("App.xaml.cs.winui.bak").exists());
}

#[test]
fn no_backup_and_skip_project_file_are_honoured() {
    let (_td, root) = create_temp_project();
    let mut s = settings(root.join("App.csproj"));
    s.no_backup = true;
    s.skip_project_file = true;
    let outcome = run_migration(&s, &TracingProgress, tool()).unwrap();

    let project = &outcome.report.projects[0];
    assert_eq!(project.files_written, Some(2));
    assert!(project.project_file_ops.is_empty());
    assert_eq!(read(&root, "App.csproj"), PROJECT);
    assert!(!root.join("App.xaml.cs.winui.bak").exists());
    assert!(!root.join("MainPage.xaml.cs.winui.bak").exists());
}

#[test]
fn configured_versions_are_pinned_on_conversion() {
    let (_td, root) = create_temp_project();
    let cfg = FactsConfig {
        package_versions: [("Microsoft.WinUI".to_string(), "3.0.0-preview4".to_string())]
            .into_iter()
            .collect(),
        ..FactsConfig::default()
    };
    let mut s = settings(root.join("App.csproj"));
    s.facts = FactTable::builtin().with_overrides(&cfg);
    run_migration(&s, &TracingProgress, tool()).unwrap();

    assert!(read(&root, "App.csproj").contains(
        r#"<PackageReference Include="Microsoft.WinUI" Version="3.0.0-preview4" />"#
    ));
}

#[test]
fn second_run_finds_nothing_to_do() {
    let (_td, root) = create_temp_project();
    let s = settings(root.join("App.csproj"));
    run_migration(&s, &TracingProgress, tool()).unwrap();
    let again = run_migration(&s, &TracingProgress, tool()).unwrap();

    assert_eq!(again.report.projects[0].status, CommitStatus::Unchanged);
    assert_eq!(again.report.summary.fixes_applied, 0);
}

#[test]
fn solution_migrates_supported_projects_only() {
    let td = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
    fs::create_dir_all(root.join("App")).unwrap();
    fs::write(root.join("App/App.csproj"), PROJECT).unwrap();
    fs::write(root.join("App/App.xaml.cs"), APP).unwrap();
    fs::write(root.join("App/MainPage.xaml.cs"), MAIN_PAGE).unwrap();
    fs::write(
        root.join("All.sln"),
        "Microsoft Visual Studio Solution File, Format Version 12.00\n\
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{11111111-1111-1111-1111-111111111111}\"\n\
EndProject\n\
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Docs\", \"Docs\", \"{33333333-3333-3333-3333-333333333333}\"\n\
EndProject\n",
    )
    .unwrap();

    let s = settings(root.join("All.sln"));
    assert_eq!(s.kind, WorkspaceKind::Solution);
    let outcome = run_migration(&s, &TracingProgress, tool()).unwrap();

    assert_eq!(outcome.report.projects.len(), 1);
    assert_eq!(outcome.report.projects[0].path, root.join("App/App.csproj").as_str());
}

#[test]
fn missing_input_is_a_tool_error() {
    let err = run_migration(
        &settings(Utf8PathBuf::from("/no/such/App.csproj")),
        &TracingProgress,
        tool(),
    )
    .unwrap_err();
    assert!(matches!(err, MigrationError::Configuration(_)));
    assert_eq!(err.exit_code(), 1);
}
