//! Known values about UWP/WinUI2 projects and how they map onto WinUI3.
//!
//! The tables are plain data. [`FactTable::builtin`] carries the values the
//! tool ships with; [`FactTable::with_overrides`] merges user configuration on
//! top so package versions and incompatible packages can be supplied per run.

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

pub const MSB_INCOMPAT_IMPORT: &str = "Xaml.CSharp.targets";
pub const MSB_INCOMPAT_REPLACE: &str = r"$(MSBuildToolsPath)\Microsoft.CSharp.targets";
pub const COMMUNITY_TOOLKIT: &str = "Microsoft.Toolkit";

/// Classification of a reference, package or property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceFact {
    KnownFrameworkReference,
    RemovableProperty,
    IncompatiblePackage,
    ConvertiblePackage { target: String },
    PinnedVersionPackage { version: String },
}

/// User-supplied additions and overrides, usually the `[facts]` table of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    pub known_references: Vec<String>,
    pub removable_properties: Vec<String>,
    pub incompatible_packages: Vec<String>,
    pub convertible_packages: BTreeMap<String, String>,
    pub package_versions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactTable {
    known_references: Vec<String>,
    removable_properties: Vec<String>,
    incompatible_packages: Vec<String>,
    convertible_packages: BTreeMap<String, String>,
    package_versions: BTreeMap<String, String>,
}

impl Default for FactTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FactTable {
    /// The tables shipped with the tool.
    ///
    /// WinUI package versions and the incompatible package list are left
    /// empty: they depend on the target SDK and must come from configuration.
    pub fn builtin() -> Self {
        Self {
            known_references: strings(&[
                "Microsoft.UI.Xaml",
                "Windows.UI.Xaml",
                "Microsoft.WinUI",
                "Microsoft.NETCore.UniversalWindowsPlatform",
            ]),
            removable_properties: strings(&[
                "DefaultLanguage",
                "ProjectGuid",
                "ProjectTypeGuids",
                "SubType",
            ]),
            incompatible_packages: Vec::new(),
            convertible_packages: pairs(&[
                ("Microsoft.UI.Xaml", "Microsoft.WinUI"),
                ("Microsoft.Xaml.Behaviors.UWP", "Microsoft.Xaml.Behaviors.WinUI"),
                ("Microsoft.Win2D.UWP", "Microsoft.Win2D.WinUI"),
            ]),
            package_versions: pairs(&[(COMMUNITY_TOOLKIT, "2.6.6")]),
        }
    }

    /// An empty table; useful when every fact comes from configuration.
    pub fn empty() -> Self {
        Self {
            known_references: Vec::new(),
            removable_properties: Vec::new(),
            incompatible_packages: Vec::new(),
            convertible_packages: BTreeMap::new(),
            package_versions: BTreeMap::new(),
        }
    }

    /// Merge configuration on top of this table. Map entries replace existing keys.
    pub fn with_overrides(mut self, cfg: &FactsConfig) -> Self {
        extend_unique(&mut self.known_references, &cfg.known_references);
        extend_unique(&mut self.removable_properties, &cfg.removable_properties);
        extend_unique(&mut self.incompatible_packages, &cfg.incompatible_packages);
        for (from, to) in &cfg.convertible_packages {
            insert_ci(&mut self.convertible_packages, from, to);
        }
        for (name, version) in &cfg.package_versions {
            insert_ci(&mut self.package_versions, name, version);
        }
        debug!(
            known = self.known_references.len(),
            incompatible = self.incompatible_packages.len(),
            convertible = self.convertible_packages.len(),
            pinned = self.package_versions.len(),
            "fact table ready"
        );
        self
    }

    /// Every fact that applies to `name` (NuGet and MSBuild names compare case-insensitively).
    pub fn classify(&self, name: &str) -> Vec<ReferenceFact> {
        let mut facts = Vec::new();
        if self.is_known_reference(name) {
            facts.push(ReferenceFact::KnownFrameworkReference);
        }
        if self.is_removable_property(name) {
            facts.push(ReferenceFact::RemovableProperty);
        }
        if self.is_incompatible(name) {
            facts.push(ReferenceFact::IncompatiblePackage);
        }
        if let Some(target) = self.conversion_target(name) {
            facts.push(ReferenceFact::ConvertiblePackage {
                target: target.to_string(),
            });
        }
        if let Some(version) = self.pinned_version(name) {
            facts.push(ReferenceFact::PinnedVersionPackage {
                version: version.to_string(),
            });
        }
        facts
    }

    pub fn is_known_reference(&self, name: &str) -> bool {
        contains_ci(&self.known_references, name)
    }

    pub fn is_removable_property(&self, name: &str) -> bool {
        contains_ci(&self.removable_properties, name)
    }

    pub fn is_incompatible(&self, name: &str) -> bool {
        contains_ci(&self.incompatible_packages, name)
    }

    pub fn conversion_target(&self, name: &str) -> Option<&str> {
        get_ci(&self.convertible_packages, name)
    }

    pub fn pinned_version(&self, name: &str) -> Option<&str> {
        get_ci(&self.package_versions, name)
    }

    pub fn known_references(&self) -> &[String] {
        &self.known_references
    }

    pub fn removable_properties(&self) -> &[String] {
        &self.removable_properties
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn contains_ci(items: &[String], name: &str) -> bool {
    items.iter().any(|i| i.eq_ignore_ascii_case(name))
}

fn get_ci<'a>(map: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn insert_ci(map: &mut BTreeMap<String, String>, key: &str, value: &str) {
    map.retain(|k, _| !k.eq_ignore_ascii_case(key));
    map.insert(key.to_string(), value.to_string());
}

fn extend_unique(items: &mut Vec<String>, extra: &[String]) {
    for e in extra {
        if !contains_ci(items, e) {
            items.push(e.clone());
        }
    }
}
