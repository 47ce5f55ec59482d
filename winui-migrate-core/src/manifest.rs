//! Project-file conversion: plan edits from the fact tables, then apply them
//! to a formatting-preserving [`ProjectRootElement`].

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};
use winui_migrate_facts::{FactTable, MSB_INCOMPAT_IMPORT, MSB_INCOMPAT_REPLACE, ReferenceFact};
use winui_migrate_workspace::{ProjectRootElement, RootElementError};

/// One planned edit. `index` is the element index in the parsed project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProjectFileOp {
    ConvertPackage {
        index: usize,
        from: String,
        to: String,
        version: Option<String>,
    },
    SetPackageVersion {
        index: usize,
        package: String,
        version: String,
    },
    RemovePackage {
        index: usize,
        package: String,
    },
    RemoveProperty {
        index: usize,
        name: String,
    },
    ReplaceImport {
        index: usize,
        from: String,
        to: String,
    },
}

impl ProjectFileOp {
    pub fn index(&self) -> usize {
        match self {
            ProjectFileOp::ConvertPackage { index, .. }
            | ProjectFileOp::SetPackageVersion { index, .. }
            | ProjectFileOp::RemovePackage { index, .. }
            | ProjectFileOp::RemoveProperty { index, .. }
            | ProjectFileOp::ReplaceImport { index, .. } => *index,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            ProjectFileOp::RemovePackage { .. } | ProjectFileOp::RemoveProperty { .. }
        )
    }
}

impl fmt::Display for ProjectFileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectFileOp::ConvertPackage {
                from,
                to,
                version: Some(v),
                ..
            } => write!(f, "convert package {from} -> {to} {v}"),
            ProjectFileOp::ConvertPackage { from, to, .. } => {
                write!(f, "convert package {from} -> {to}")
            }
            ProjectFileOp::SetPackageVersion {
                package, version, ..
            } => write!(f, "set {package} version to {version}"),
            ProjectFileOp::RemovePackage { package, .. } => {
                write!(f, "remove incompatible package {package}")
            }
            ProjectFileOp::RemoveProperty { name, .. } => write!(f, "remove property {name}"),
            ProjectFileOp::ReplaceImport { from, to, .. } => {
                write!(f, "replace import {from} with {to}")
            }
        }
    }
}

/// Plan the project-file edits for `root`, in element order.
pub fn plan_project_conversion(root: &ProjectRootElement, facts: &FactTable) -> Vec<ProjectFileOp> {
    let mut ops = Vec::new();

    for package in root.package_references() {
        let classes = facts.classify(&package.name);
        if classes.contains(&ReferenceFact::IncompatiblePackage) {
            ops.push(ProjectFileOp::RemovePackage {
                index: package.index,
                package: package.name,
            });
            continue;
        }

        let target = classes.iter().find_map(|f| match f {
            ReferenceFact::ConvertiblePackage { target } => Some(target.clone()),
            _ => None,
        });
        if let Some(to) = target {
            let version = facts.pinned_version(&to).map(str::to_string);
            if version.is_none() {
                warn!(
                    project = %root.path(),
                    package = %to,
                    "no version configured for converted package; keeping the existing version"
                );
            }
            ops.push(ProjectFileOp::ConvertPackage {
                index: package.index,
                from: package.name,
                to,
                version,
            });
            continue;
        }

        let pinned = classes.iter().find_map(|f| match f {
            ReferenceFact::PinnedVersionPackage { version } => Some(version.clone()),
            _ => None,
        });
        if let Some(version) = pinned
            && package.version.as_deref() != Some(version.as_str())
        {
            ops.push(ProjectFileOp::SetPackageVersion {
                index: package.index,
                package: package.name,
                version,
            });
        }
    }

    for property in root.properties() {
        if facts.is_removable_property(&property.name) {
            ops.push(ProjectFileOp::RemoveProperty {
                index: property.index,
                name: property.name,
            });
        }
    }

    for import in root.imports() {
        if ends_with_ci(&import.project, MSB_INCOMPAT_IMPORT) {
            ops.push(ProjectFileOp::ReplaceImport {
                index: import.index,
                from: import.project,
                to: MSB_INCOMPAT_REPLACE.to_string(),
            });
        }
    }

    ops.sort_by_key(ProjectFileOp::index);
    debug!(project = %root.path(), ops = ops.len(), "project conversion planned");
    ops
}

/// Apply planned ops. In-place edits go first; removals run last, highest
/// index first, so earlier indices stay valid.
pub fn apply_project_conversion(
    root: &mut ProjectRootElement,
    ops: &[ProjectFileOp],
) -> Result<(), RootElementError> {
    for op in ops.iter().filter(|op| !op.is_removal()) {
        match op {
            ProjectFileOp::ConvertPackage {
                index, to, version, ..
            } => {
                root.rename_package(*index, to)?;
                if let Some(version) = version {
                    root.set_package_version(*index, version)?;
                }
            }
            ProjectFileOp::SetPackageVersion { index, version, .. } => {
                root.set_package_version(*index, version)?;
            }
            ProjectFileOp::ReplaceImport { index, to, .. } => {
                root.set_attribute(*index, "Project", to)?;
            }
            ProjectFileOp::RemovePackage { .. } | ProjectFileOp::RemoveProperty { .. } => {}
        }
    }

    let mut removals: Vec<usize> = ops
        .iter()
        .filter(|op| op.is_removal())
        .map(ProjectFileOp::index)
        .collect();
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        root.remove_element(index)?;
    }
    Ok(())
}

fn ends_with_ci(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value
            .get(value.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}
