//! Framework reference metadata handed to the compilation as auxiliary inputs.
//!
//! These tables stand in for the reference assemblies a real build would
//! supply. They are attached to a snapshot for analysis only and must be
//! detached before commit.

use winui_migrate_workspace::{AuxiliaryInput, MetadataSymbol, SymbolKind};
use SymbolKind::{Class, Enum, Interface, Struct};

pub const CORLIB: &str = "System.Runtime";
pub const UWP_WINMD: &str = "Windows";
pub const WINUI: &str = "Microsoft.WinUI";

const CORLIB_TYPES: &[(&str, &str, SymbolKind)] = &[
    ("System", "Object", Class),
    ("System", "String", Class),
    ("System", "EventArgs", Class),
    ("System", "TimeSpan", Struct),
    ("System.ComponentModel", "INotifyPropertyChanged", Interface),
    ("System.ComponentModel", "PropertyChangedEventArgs", Class),
    ("System.ComponentModel", "PropertyChangedEventHandler", Class),
    ("System.Collections", "IEnumerable", Interface),
    ("System.Collections.Specialized", "INotifyCollectionChanged", Interface),
    ("System.Collections.Specialized", "NotifyCollectionChangedEventArgs", Class),
    ("System.Collections.Specialized", "NotifyCollectionChangedEventHandler", Class),
    ("System.Collections.Specialized", "NotifyCollectionChangedAction", Enum),
    ("System.Windows.Input", "ICommand", Interface),
];

const UWP_TYPES: &[(&str, &str, SymbolKind)] = &[
    ("Windows.UI.Xaml", "Thickness", Struct),
    ("Windows.UI.Xaml", "CornerRadius", Struct),
    ("Windows.UI.Xaml", "GridLength", Struct),
    ("Windows.UI.Xaml", "Duration", Struct),
    ("Windows.UI.Xaml", "GridUnitType", Enum),
    ("Windows.UI.Xaml", "ThicknessHelper", Class),
    ("Windows.UI.Xaml", "CornerRadiusHelper", Class),
    ("Windows.UI.Xaml", "GridLengthHelper", Class),
    ("Windows.UI.Xaml", "DurationHelper", Class),
    ("Windows.UI.Xaml", "Application", Class),
    ("Windows.UI.Xaml", "Window", Class),
    ("Windows.UI.Xaml", "DependencyObject", Class),
    ("Windows.UI.Xaml", "FrameworkElement", Class),
    ("Windows.UI.Xaml", "UIElement", Class),
    ("Windows.UI.Xaml.Controls", "Page", Class),
    ("Windows.UI.Xaml.Controls", "Frame", Class),
    ("Windows.UI.Xaml.Controls", "Grid", Class),
    ("Windows.UI.Xaml.Controls", "Button", Class),
    ("Windows.UI.Xaml.Data", "INotifyPropertyChanged", Interface),
    ("Windows.UI.Xaml.Data", "PropertyChangedEventArgs", Class),
    ("Windows.UI.Xaml.Data", "PropertyChangedEventHandler", Class),
    ("Windows.UI.Xaml.Input", "ICommand", Interface),
    ("Windows.UI.Xaml.Interop", "INotifyCollectionChanged", Interface),
    ("Windows.UI.Xaml.Interop", "NotifyCollectionChangedEventArgs", Class),
    ("Windows.UI.Xaml.Interop", "NotifyCollectionChangedEventHandler", Class),
    ("Windows.UI.Xaml.Interop", "NotifyCollectionChangedAction", Enum),
    ("Windows.UI.Xaml.Interop", "IBindableIterable", Interface),
    ("Windows.UI.Composition", "Compositor", Class),
    ("Windows.UI.Composition", "Visual", Class),
    ("Windows.ApplicationModel.Activation", "LaunchActivatedEventArgs", Class),
    ("Windows.ApplicationModel.Activation", "IActivatedEventArgs", Interface),
];

const WINUI_TYPES: &[(&str, &str, SymbolKind)] = &[
    ("Microsoft.UI.Xaml", "Thickness", Struct),
    ("Microsoft.UI.Xaml", "CornerRadius", Struct),
    ("Microsoft.UI.Xaml", "GridLength", Struct),
    ("Microsoft.UI.Xaml", "Duration", Struct),
    ("Microsoft.UI.Xaml", "GridUnitType", Enum),
    ("Microsoft.UI.Xaml", "ThicknessHelper", Class),
    ("Microsoft.UI.Xaml", "CornerRadiusHelper", Class),
    ("Microsoft.UI.Xaml", "GridLengthHelper", Class),
    ("Microsoft.UI.Xaml", "DurationHelper", Class),
    ("Microsoft.UI.Xaml", "Application", Class),
    ("Microsoft.UI.Xaml", "Window", Class),
    ("Microsoft.UI.Xaml", "DependencyObject", Class),
    ("Microsoft.UI.Xaml", "FrameworkElement", Class),
    ("Microsoft.UI.Xaml", "UIElement", Class),
    ("Microsoft.UI.Xaml", "LaunchActivatedEventArgs", Class),
    ("Microsoft.UI.Xaml.Controls", "Page", Class),
    ("Microsoft.UI.Xaml.Controls", "Frame", Class),
    ("Microsoft.UI.Xaml.Controls", "Grid", Class),
    ("Microsoft.UI.Xaml.Controls", "Button", Class),
    ("Microsoft.UI.Composition", "Compositor", Class),
    ("Microsoft.UI.Composition", "Visual", Class),
];

fn input(name: &str, table: &[(&str, &str, SymbolKind)]) -> AuxiliaryInput {
    AuxiliaryInput::new(
        name,
        table
            .iter()
            .map(|&(ns, ty, kind)| MetadataSymbol::new(ns, ty, kind))
            .collect(),
    )
}

/// Reference metadata for the base library, UWP and WinUI 3.
pub fn framework_references() -> Vec<AuxiliaryInput> {
    vec![
        input(CORLIB, CORLIB_TYPES),
        input(UWP_WINMD, UWP_TYPES),
        input(WINUI, WINUI_TYPES),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_have_distinct_names() {
        let refs = framework_references();
        let mut names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        names.dedup();
        assert_eq!(names.len(), 3);
        assert!(refs.iter().all(|r| !r.symbols.is_empty()));
    }
}
