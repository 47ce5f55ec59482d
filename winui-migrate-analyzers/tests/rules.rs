//! Built-in rule behaviour against in-memory snapshots.

use pretty_assertions::assert_eq;
use winui_migrate_analyzers::{
    Analyzer, BuiltinAnalyzer, CodeFix, Compilation, EventArgsAnalyzer, EventArgsCodeFix,
    FixContext, NamespaceAnalyzer, NamespaceCodeFix, UwpProjectionAnalyzer, UwpProjectionCodeFix,
    UwpStructAnalyzer, UwpStructCodeFix, builtin_analyzers, diagnostics_for,
    framework_references,
};
use winui_migrate_types::DocumentId;
use winui_migrate_workspace::ProjectSnapshot;

fn project(source: &str) -> (ProjectSnapshot, DocumentId) {
    let snapshot = ProjectSnapshot::new(
        "/app/App.csproj".into(),
        "<Project />",
        vec![("/app/MainPage.xaml.cs".into(), source.to_string())],
    )
    .add_auxiliary_inputs(&framework_references());
    let id = snapshot.documents_of()[0];
    (snapshot, id)
}

fn text(snapshot: &ProjectSnapshot, id: DocumentId) -> String {
    snapshot.resolve_document(id).unwrap().text.to_string()
}

/// Fix the first diagnostic until none are left or no action is offered.
fn fix_all(
    analyzer: &dyn Analyzer,
    fixer: &dyn CodeFix,
    mut snapshot: ProjectSnapshot,
    id: DocumentId,
) -> (ProjectSnapshot, usize) {
    let mut applied = 0;
    for _ in 0..32 {
        let doc = snapshot.resolve_document(id).unwrap();
        let diagnostics = diagnostics_for(analyzer, &doc, &snapshot).unwrap();
        let Some(first) = diagnostics.first() else { break };
        let mut ctx = FixContext::new(&doc, first);
        fixer.register_code_fixes(&mut ctx);
        let Some(action) = ctx.into_actions().into_iter().next() else { break };
        snapshot = action.apply(&snapshot).unwrap();
        applied += 1;
    }
    (snapshot, applied)
}

const STRUCTS: &str = r#"using Windows.UI.Xaml;

namespace App
{
    public sealed partial class MainPage
    {
        void Layout()
        {
            var margin = new Thickness(1, 2, 3, 4);
            var radius = new CornerRadius(8);
            var width = new Windows.UI.Xaml.GridLength(1, GridUnitType.Star);
            var label = "new Thickness(0)";
        }
    }
}
"#;

#[test]
fn struct_constructors_are_rewritten_to_helpers() {
    let (snapshot, id) = project(STRUCTS);
    let doc = snapshot.resolve_document(id).unwrap();
    let found = diagnostics_for(&UwpStructAnalyzer, &doc, &snapshot).unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.windows(2).all(|w| w[0].offset() <= w[1].offset()));

    let (fixed, applied) = fix_all(&UwpStructAnalyzer, &UwpStructCodeFix, snapshot, id);
    assert_eq!(applied, 3);
    let out = text(&fixed, id);
    assert!(out.contains("ThicknessHelper.FromLengths(1, 2, 3, 4)"));
    assert!(out.contains("CornerRadiusHelper.FromUniformRadius(8)"));
    assert!(out.contains("Windows.UI.Xaml.GridLengthHelper.FromValueAndType(1, GridUnitType.Star)"));
    assert!(out.contains("\"new Thickness(0)\""));
}

#[test]
fn unsupported_arity_is_diagnosed_but_not_fixed() {
    let (snapshot, id) = project("using Windows.UI.Xaml;\nclass P { object t = new Thickness(1, 2); }\n");
    let doc = snapshot.resolve_document(id).unwrap();
    let found = diagnostics_for(&UwpStructAnalyzer, &doc, &snapshot).unwrap();
    assert_eq!(found.len(), 1);

    let mut ctx = FixContext::new(&doc, &found[0]);
    UwpStructCodeFix.register_code_fixes(&mut ctx);
    assert!(ctx.into_actions().is_empty());
}

#[test]
fn struct_analyzer_needs_reference_metadata() {
    let snapshot = ProjectSnapshot::new(
        "/app/App.csproj".into(),
        "<Project />",
        vec![("/app/A.cs".into(), STRUCTS.to_string())],
    );
    let compilation = Compilation::build(&snapshot).unwrap();
    assert!(UwpStructAnalyzer.analyze(&compilation).unwrap().is_empty());
}

#[test]
fn projections_replace_simple_and_qualified_names() {
    let source = r#"using Windows.UI.Xaml.Data;
class Vm : INotifyPropertyChanged
{
    public event PropertyChangedEventHandler PropertyChanged;
    Windows.UI.Xaml.Input.ICommand Save;
}
"#;
    let (snapshot, id) = project(source);
    let (fixed, applied) = fix_all(&UwpProjectionAnalyzer, &UwpProjectionCodeFix, snapshot, id);
    assert_eq!(applied, 3);
    assert_eq!(
        text(&fixed, id),
        r#"using Windows.UI.Xaml.Data;
class Vm : System.ComponentModel.INotifyPropertyChanged
{
    public event System.ComponentModel.PropertyChangedEventHandler PropertyChanged;
    System.Windows.Input.ICommand Save;
}
"#
    );
}

#[test]
fn launch_args_are_requalified() {
    let source = r#"using Windows.ApplicationModel.Activation;
sealed partial class App
{
    protected override void OnLaunched(LaunchActivatedEventArgs e) { }
}
"#;
    let (snapshot, id) = project(source);
    let (fixed, applied) = fix_all(&EventArgsAnalyzer, &EventArgsCodeFix, snapshot, id);
    assert_eq!(applied, 1);
    assert!(text(&fixed, id).contains("OnLaunched(Microsoft.UI.Xaml.LaunchActivatedEventArgs e)"));
}

#[test]
fn namespaces_move_to_microsoft() {
    let source = "using Windows.UI.Xaml;\nusing Windows.UI.Xaml.Controls;\nusing Windows.UI.Composition;\nusing Windows.Storage;\nclass P { Windows.UI.Xaml.Controls.Page page; }\n";
    let (snapshot, id) = project(source);
    let (fixed, applied) = fix_all(&NamespaceAnalyzer, &NamespaceCodeFix, snapshot, id);
    assert_eq!(applied, 4);
    assert_eq!(
        text(&fixed, id),
        "using Microsoft.UI.Xaml;\nusing Microsoft.UI.Xaml.Controls;\nusing Microsoft.UI.Composition;\nusing Windows.Storage;\nclass P { Microsoft.UI.Xaml.Controls.Page page; }\n"
    );
}

#[test]
fn base_list_namespaces_are_detected() {
    let source = "class MainPage : Windows.UI.Xaml.Controls.Page { }\n";
    let (snapshot, id) = project(source);
    let doc = snapshot.resolve_document(id).unwrap();
    assert_eq!(diagnostics_for(&NamespaceAnalyzer, &doc, &snapshot).unwrap().len(), 1);

    let (fixed, applied) = fix_all(&NamespaceAnalyzer, &NamespaceCodeFix, snapshot, id);
    assert_eq!(applied, 1);
    assert_eq!(text(&fixed, id), "class MainPage : Microsoft.UI.Xaml.Controls.Page { }\n");
}

#[test]
fn base_list_projections_are_detected() {
    let source = "using Windows.UI.Xaml.Data;\nclass Vm : Base, INotifyPropertyChanged { }\n";
    let (snapshot, id) = project(source);
    let doc = snapshot.resolve_document(id).unwrap();
    let found = diagnostics_for(&UwpProjectionAnalyzer, &doc, &snapshot).unwrap();
    assert_eq!(found.len(), 1);

    let (fixed, applied) = fix_all(&UwpProjectionAnalyzer, &UwpProjectionCodeFix, snapshot, id);
    assert_eq!(applied, 1);
    assert_eq!(
        text(&fixed, id),
        "using Windows.UI.Xaml.Data;\nclass Vm : Base, System.ComponentModel.INotifyPropertyChanged { }\n"
    );
}

#[test]
fn builtin_analyzers_run_in_priority_order() {
    let names: Vec<&str> = builtin_analyzers()
        .iter()
        .map(|a| match a {
            BuiltinAnalyzer::Struct(_) => "struct",
            BuiltinAnalyzer::Projection(_) => "projection",
            BuiltinAnalyzer::EventArgs(_) => "event_args",
            BuiltinAnalyzer::Namespace(_) => "namespace",
        })
        .collect();
    assert_eq!(names, vec!["struct", "projection", "event_args", "namespace"]);
}
