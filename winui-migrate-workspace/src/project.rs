use crate::error::LoadError;
use crate::root_element::ProjectRootElement;
use crate::snapshot::ProjectSnapshot;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use tracing::{debug, warn};

/// Opens project files into root snapshots.
#[derive(Debug, Clone, Default)]
pub struct ProjectLoader;

impl ProjectLoader {
    /// Load a project and its C# documents.
    ///
    /// SDK-style projects (unless `EnableDefaultCompileItems` is false) and
    /// projects without any `<Compile Include>` get every `**/*.cs` below
    /// their directory, excluding `bin/` and `obj/`, sorted by path. The
    /// `<Compile Include>` items follow in file order, then `<Compile Remove>`
    /// items are taken out.
    pub fn open(&self, project_path: &Utf8Path) -> Result<ProjectSnapshot, LoadError> {
        let path = absolute(project_path);
        if !path.is_file() {
            return Err(LoadError::NotFound { path });
        }

        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let root = ProjectRootElement::parse(&path, text)?;
        let dir = path.parent().unwrap_or(Utf8Path::new(".")).to_path_buf();

        let includes = root.compile_items();
        let mut files = if root.default_compile_items_enabled() || includes.is_empty() {
            debug!(project = %path, "globbing default compile items **/*.cs");
            default_compile_items(&dir)?
        } else {
            Vec::new()
        };
        for file in explicit_compile_items(&dir, &includes)? {
            if !files.contains(&file) {
                files.push(file);
            }
        }
        let removed = removed_compile_items(&dir, &root.compile_removes())?;
        files.retain(|f| !removed.contains(f));

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let text = fs::read_to_string(&file).map_err(|source| LoadError::Io {
                path: file.clone(),
                source,
            })?;
            documents.push((file, text));
        }

        debug!(project = %path, documents = documents.len(), "project loaded");
        Ok(ProjectSnapshot::new(path, root.into_text(), documents))
    }
}

fn absolute(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir()
        .ok()
        .and_then(|cwd| Utf8PathBuf::from_path_buf(cwd).ok())
    {
        Some(cwd) => cwd.join(path),
        None => path.to_path_buf(),
    }
}

fn explicit_compile_items(dir: &Utf8Path, includes: &[String]) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let mut out = Vec::new();
    for include in includes {
        let rel = include.replace('\\', "/");
        if rel.contains('*') || rel.contains('?') {
            for file in glob_files(&dir.join(&rel))? {
                if !out.contains(&file) {
                    out.push(file);
                }
            }
            continue;
        }
        let file = dir.join(&rel);
        if !file.is_file() {
            warn!(item = %include, "compile item does not exist and will be skipped");
            continue;
        }
        if !out.contains(&file) {
            out.push(file);
        }
    }
    Ok(out)
}

fn removed_compile_items(dir: &Utf8Path, removes: &[String]) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let mut out = Vec::new();
    for remove in removes {
        let rel = remove.replace('\\', "/");
        if rel.contains('*') || rel.contains('?') {
            out.extend(glob_files(&dir.join(&rel))?);
        } else {
            out.push(dir.join(&rel));
        }
    }
    Ok(out)
}

fn default_compile_items(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let mut files: Vec<Utf8PathBuf> = glob_files(&dir.join("**/*.cs"))?
        .into_iter()
        .filter(|f| {
            f.strip_prefix(dir)
                .map(|rel| {
                    !rel.components()
                        .any(|c| c.as_str().eq_ignore_ascii_case("bin") || c.as_str().eq_ignore_ascii_case("obj"))
                })
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn glob_files(pattern: &Utf8Path) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let entries = glob(pattern.as_str()).map_err(|e| LoadError::Glob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LoadError::Glob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        match Utf8PathBuf::from_path_buf(path) {
            Ok(p) if p.is_file() => out.push(p),
            Ok(_) => {}
            Err(p) => warn!(path = %p.display(), "skipping non-utf8 path"),
        }
    }
    out.sort();
    Ok(out)
}
