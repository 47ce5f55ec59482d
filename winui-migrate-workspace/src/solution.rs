//! Minimal `.sln` reader: enough to list the buildable projects of a solution.

use crate::error::LoadError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{debug, warn};

const SOLUTION_FOLDER_GUID: &str = "2150E333-8FDC-42A3-9474-1A3956D46DE8";
const WEB_PROJECT_GUID: &str = "E24C65DC-7377-472B-9ABA-BC803B73C61A";
const MSBUILD_EXTENSIONS: &[&str] = &["csproj", "vbproj", "fsproj", "vcxproj", "wapproj", "proj"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionProjectType {
    KnownToBeMSBuildFormat,
    SolutionFolder,
    WebProject,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    pub name: String,
    pub relative_path: String,
    pub absolute_path: Utf8PathBuf,
    pub project_type: SolutionProjectType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionProjects {
    /// Buildable projects, in solution order.
    pub projects: Vec<Utf8PathBuf>,
    pub skipped: Vec<SolutionEntry>,
}

/// Read a solution file and keep only entries known to be MSBuild projects.
///
/// Every other entry is skipped with a warning; skipping is never fatal.
pub fn parse_solution(path: &Utf8Path) -> Result<SolutionProjects, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = path.parent().unwrap_or(Utf8Path::new("."));
    let entries = parse_entries(dir, &text).map_err(|message| LoadError::Solution {
        path: path.to_path_buf(),
        message,
    })?;

    let mut out = SolutionProjects::default();
    for entry in entries {
        if entry.project_type == SolutionProjectType::KnownToBeMSBuildFormat {
            out.projects.push(entry.absolute_path);
        } else {
            warn!(
                "{} is not a supported project type and will be skipped.",
                entry.absolute_path
            );
            out.skipped.push(entry);
        }
    }
    debug!(solution = %path, projects = out.projects.len(), skipped = out.skipped.len(), "solution parsed");
    Ok(out)
}

fn parse_entries(dir: &Utf8Path, text: &str) -> Result<Vec<SolutionEntry>, String> {
    let has_header = text
        .lines()
        .take(5)
        .any(|l| l.trim().starts_with("Microsoft Visual Studio Solution File"));
    if !has_header {
        return Err("missing 'Microsoft Visual Studio Solution File' header".to_string());
    }

    let mut entries = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with("Project(") {
            continue;
        }
        let quoted = quoted_values(line);
        let [type_guid, name, rel, _guid] = quoted.as_slice() else {
            return Err(format!("line {}: malformed Project entry", n + 1));
        };

        let relative_path = rel.replace('\\', "/");
        let absolute_path = dir.join(&relative_path);
        let project_type = classify(type_guid, &relative_path);
        entries.push(SolutionEntry {
            name: name.to_string(),
            relative_path,
            absolute_path,
            project_type,
        });
    }
    Ok(entries)
}

fn quoted_values(line: &str) -> Vec<&str> {
    line.split('"').skip(1).step_by(2).collect()
}

fn classify(type_guid: &str, relative_path: &str) -> SolutionProjectType {
    let guid = type_guid.trim_matches(|c| c == '{' || c == '}');
    if guid.eq_ignore_ascii_case(SOLUTION_FOLDER_GUID) {
        return SolutionProjectType::SolutionFolder;
    }
    if guid.eq_ignore_ascii_case(WEB_PROJECT_GUID) {
        return SolutionProjectType::WebProject;
    }
    let known = Utf8Path::new(relative_path)
        .extension()
        .is_some_and(|ext| MSBUILD_EXTENSIONS.iter().any(|k| k.eq_ignore_ascii_case(ext)));
    if known {
        SolutionProjectType::KnownToBeMSBuildFormat
    } else {
        SolutionProjectType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SLN: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 16
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "App", "App\App.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Docs", "Docs", "{22222222-2222-2222-2222-222222222222}"
EndProject
Project("{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}") = "Setup", "Setup\Setup.vdproj", "{33333333-3333-3333-3333-333333333333}"
EndProject
"#;

    #[test]
    fn classifies_entries() {
        let entries = parse_entries(Utf8Path::new("/src"), SLN).unwrap();
        let kinds: Vec<SolutionProjectType> = entries.iter().map(|e| e.project_type).collect();
        assert_eq!(
            kinds,
            vec![
                SolutionProjectType::KnownToBeMSBuildFormat,
                SolutionProjectType::SolutionFolder,
                SolutionProjectType::Unknown,
            ]
        );
        assert_eq!(entries[0].absolute_path, Utf8PathBuf::from("/src/App/App.csproj"));
        assert_eq!(entries[0].name, "App");
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = parse_entries(Utf8Path::new("/src"), "Project(\"{X}\") = \"a\", \"a.csproj\", \"{Y}\"")
            .unwrap_err();
        assert!(err.contains("header"));
    }

    #[test]
    fn malformed_entry_reports_line() {
        let text = "Microsoft Visual Studio Solution File, Format Version 12.00\nProject(\"{X}\") = \"a\"\n";
        let err = parse_entries(Utf8Path::new("/src"), text).unwrap_err();
        assert!(err.starts_with("line 2"));
    }
}
