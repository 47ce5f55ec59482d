//! Configuration file loading for winui-migrate.
//!
//! Discovers and loads `winui-migrate.toml` from the directory holding the
//! project or solution. Merges config file settings with CLI arguments (CLI
//! takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use winui_migrate_facts::{FactTable, FactsConfig};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "winui-migrate.toml";

/// Top-level configuration from winui-migrate.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Additions and overrides for the built-in fact tables.
    pub facts: FactsConfig,

    /// Backup settings.
    pub backups: BackupsConfig,
}

/// Backups section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to keep a copy of every file before it is replaced.
    pub enabled: bool,

    /// Suffix for backup files.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: ".winui.bak".to_string(),
        }
    }
}

/// Discover the winui-migrate.toml config file next to `input`.
///
/// Returns `None` if no config file is found.
pub fn discover_config(input: &Utf8Path) -> Option<Utf8PathBuf> {
    let dir = match input.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a winui-migrate.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<MigrateConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<MigrateConfig> {
    let config: MigrateConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config file if given, else discover one beside `input`,
/// else return the defaults.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    input: &Utf8Path,
) -> anyhow::Result<MigrateConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(input) {
        Some(path) => load_config(&path),
        None => Ok(MigrateConfig::default()),
    }
}

/// Config file and CLI arguments folded together.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub no_backup: bool,
    pub backup_suffix: String,
    pub facts: FactTable,
}

impl MigrateConfig {
    /// CLI `--no-backup` wins over `[backups] enabled = true`.
    pub fn merge(self, cli_no_backup: bool) -> MergedConfig {
        MergedConfig {
            no_backup: cli_no_backup || !self.backups.enabled,
            backup_suffix: self.backups.suffix,
            facts: FactTable::builtin().with_overrides(&self.facts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
[facts]
incompatible_packages = ["Microsoft.Toolkit.Uwp.UI.Controls"]
removable_properties = ["WindowsXamlEnableOverview"]

[facts.package_versions]
"Microsoft.WinUI" = "3.0.0-preview4.210210.4"

[facts.convertible_packages]
"Microsoft.Toolkit.Uwp.UI.Lottie" = "CommunityToolkit.WinUI.Lottie"

[backups]
enabled = true
suffix = ".orig"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(
            config.facts.incompatible_packages,
            vec!["Microsoft.Toolkit.Uwp.UI.Controls"]
        );
        assert_eq!(
            config.facts.package_versions.get("Microsoft.WinUI"),
            Some(&"3.0.0-preview4.210210.4".to_string())
        );
        assert!(config.backups.enabled);
        assert_eq!(config.backups.suffix, ".orig");

        let merged = config.merge(false);
        assert!(merged.facts.is_incompatible("microsoft.toolkit.uwp.ui.controls"));
        assert!(merged.facts.is_removable_property("WindowsXamlEnableOverview"));
        assert!(merged.facts.is_removable_property("ProjectGuid"));
        assert_eq!(
            merged.facts.conversion_target("Microsoft.Toolkit.Uwp.UI.Lottie"),
            Some("CommunityToolkit.WinUI.Lottie")
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.facts.incompatible_packages.is_empty());
        assert!(config.backups.enabled);
        assert_eq!(config.backups.suffix, ".winui.bak");
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = parse_config("[backups\nenabled = true").unwrap_err();
        assert!(format!("{err:#}").contains("invalid TOML"));
    }

    #[test]
    fn test_cli_no_backup_wins() {
        assert!(MigrateConfig::default().merge(true).no_backup);
        assert!(!MigrateConfig::default().merge(false).no_backup);

        let disabled = MigrateConfig {
            backups: BackupsConfig {
                enabled: false,
                ..BackupsConfig::default()
            },
            ..MigrateConfig::default()
        };
        assert!(disabled.merge(false).no_backup);
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let input = root.join("App.csproj");
        assert!(discover_config(&input).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert_eq!(discover_config(&input), Some(root.join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_explicit_config_is_preferred() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        std::fs::write(root.join(CONFIG_FILE_NAME), "[backups]\nsuffix = \".near\"\n").unwrap();
        let explicit = root.join("other.toml");
        std::fs::write(&explicit, "[backups]\nsuffix = \".far\"\n").unwrap();

        let cfg = load_or_default(Some(&explicit), &root.join("App.csproj")).unwrap();
        assert_eq!(cfg.backups.suffix, ".far");
        let cfg = load_or_default(None, &root.join("App.csproj")).unwrap();
        assert_eq!(cfg.backups.suffix, ".near");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = load_or_default(Some(Utf8Path::new("/no/such/winui-migrate.toml")), Utf8Path::new("App.csproj"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("read config file"));
    }
}
