//! Commit gate: write a final snapshot back to disk, all or nothing.

use crate::error::{LoadError, PersistenceError};
use crate::project::ProjectLoader;
use crate::snapshot::ProjectSnapshot;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::create_patch;
use fs_err as fs;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct CommitOptions {
    pub backup_enabled: bool,
    pub backup_suffix: String,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            backup_enabled: true,
            backup_suffix: ".winui.bak".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub files_written: Vec<Utf8PathBuf>,
    pub backups: Vec<Utf8PathBuf>,
}

#[derive(Debug, Clone)]
struct PendingWrite {
    path: Utf8PathBuf,
    before: String,
    after: String,
}

/// A loaded project plus what it looked like on disk when loaded.
#[derive(Debug, Clone)]
pub struct ProjectWorkspace {
    current: ProjectSnapshot,
    hashes: BTreeMap<Utf8PathBuf, String>,
    options: CommitOptions,
}

impl ProjectWorkspace {
    pub fn open(project_path: &Utf8Path, options: CommitOptions) -> Result<Self, LoadError> {
        let snapshot = ProjectLoader.open(project_path)?;
        Ok(Self::from_snapshot(snapshot, options))
    }

    /// Wrap a snapshot whose contents match the files on disk.
    pub fn from_snapshot(snapshot: ProjectSnapshot, options: CommitOptions) -> Self {
        let mut hashes = BTreeMap::new();
        hashes.insert(
            snapshot.path().to_path_buf(),
            sha256_hex(snapshot.project_text().as_bytes()),
        );
        for id in snapshot.documents_of() {
            if let Some(doc) = snapshot.resolve_document(id) {
                hashes.insert(doc.path, sha256_hex(doc.text.as_bytes()));
            }
        }
        Self {
            current: snapshot,
            hashes,
            options,
        }
    }

    /// The last committed (or originally loaded) snapshot.
    pub fn current_snapshot(&self) -> &ProjectSnapshot {
        &self.current
    }

    /// Unified diff between the current state and `snapshot`; nothing is written.
    pub fn preview_patch(&self, snapshot: &ProjectSnapshot) -> Result<String, PersistenceError> {
        let writes = self.pending_writes(snapshot)?;
        Ok(render_patch(&writes))
    }

    /// Persist `snapshot`. Either every changed file is replaced or none is.
    pub fn try_apply_changes(
        &mut self,
        snapshot: &ProjectSnapshot,
    ) -> Result<CommitSummary, PersistenceError> {
        if snapshot.has_auxiliary_inputs() {
            return Err(PersistenceError::AuxiliaryInputsPresent {
                count: snapshot.auxiliary_inputs().count(),
            });
        }
        let writes = self.pending_writes(snapshot)?;
        if writes.is_empty() {
            debug!(project = %snapshot.path(), "nothing to commit");
            self.current = snapshot.clone();
            return Ok(CommitSummary::default());
        }

        for w in &writes {
            self.check_unchanged_on_disk(&w.path)?;
        }

        let mut staged = Vec::with_capacity(writes.len());
        for w in &writes {
            staged.push(stage(w)?);
        }

        let mut summary = CommitSummary::default();
        if self.options.backup_enabled {
            for w in &writes {
                let backup = Utf8PathBuf::from(format!("{}{}", w.path, self.options.backup_suffix));
                fs::copy(&w.path, &backup).map_err(|source| PersistenceError::Io {
                    path: backup.clone(),
                    source,
                })?;
                summary.backups.push(backup);
            }
        }

        replace_all(&writes, staged, |tmp, path| {
            tmp.persist(path).map(|_| ()).map_err(|err| err.error)
        })?;

        for w in &writes {
            self.hashes
                .insert(w.path.clone(), sha256_hex(w.after.as_bytes()));
            summary.files_written.push(w.path.clone());
        }
        self.current = snapshot.clone();
        info!(
            project = %snapshot.path(),
            files = summary.files_written.len(),
            "changes committed"
        );
        Ok(summary)
    }

    fn pending_writes(&self, snapshot: &ProjectSnapshot) -> Result<Vec<PendingWrite>, PersistenceError> {
        if !snapshot.same_lineage(&self.current) {
            return Err(PersistenceError::ForeignSnapshot);
        }
        if let Some(id) = snapshot.removed_documents(&self.current).first() {
            let path = self
                .current
                .resolve_document(*id)
                .map(|d| d.path)
                .unwrap_or_default();
            return Err(PersistenceError::DocumentRemoved { path });
        }

        let mut writes = Vec::new();
        if snapshot.project_text() != self.current.project_text() {
            writes.push(PendingWrite {
                path: snapshot.path().to_path_buf(),
                before: self.current.project_text().to_string(),
                after: snapshot.project_text().to_string(),
            });
        }
        for id in snapshot.changed_documents(&self.current) {
            let (Some(before), Some(after)) = (
                self.current.resolve_document(id),
                snapshot.resolve_document(id),
            ) else {
                continue;
            };
            writes.push(PendingWrite {
                path: after.path,
                before: before.text.to_string(),
                after: after.text.to_string(),
            });
        }
        Ok(writes)
    }

    fn check_unchanged_on_disk(&self, path: &Utf8Path) -> Result<(), PersistenceError> {
        let expected = self.hashes.get(path);
        let actual = fs::read(path).ok().map(|bytes| sha256_hex(&bytes));
        match (expected, actual) {
            (Some(e), Some(a)) if *e == a => Ok(()),
            _ => Err(PersistenceError::PreconditionMismatch {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn stage(w: &PendingWrite) -> Result<NamedTempFile, PersistenceError> {
    let dir = w.path.parent().unwrap_or(Utf8Path::new("."));
    let io_err = |source| PersistenceError::Io {
        path: w.path.clone(),
        source,
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".winui-migrate-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err)?;
    tmp.write_all(w.after.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    Ok(tmp)
}

/// Move staged files over their targets in order. On the first failure the
/// files already replaced get their previous text back.
fn replace_all<F>(
    writes: &[PendingWrite],
    staged: Vec<NamedTempFile>,
    mut persist: F,
) -> Result<(), PersistenceError>
where
    F: FnMut(NamedTempFile, &Utf8Path) -> std::io::Result<()>,
{
    let mut replaced: Vec<&PendingWrite> = Vec::new();
    for (w, tmp) in writes.iter().zip(staged) {
        if let Err(source) = persist(tmp, &w.path) {
            rollback(&replaced);
            return Err(PersistenceError::Io {
                path: w.path.clone(),
                source,
            });
        }
        replaced.push(w);
    }
    Ok(())
}

fn rollback(replaced: &[&PendingWrite]) {
    for w in replaced.iter().rev() {
        if let Err(e) = fs::write(&w.path, &w.before) {
            warn!(path = %w.path, error = %e, "rollback failed");
        }
    }
}

fn render_patch(writes: &[PendingWrite]) -> String {
    let mut out = String::new();
    for w in writes {
        out.push_str(&format!("diff --git a/{0} b/{0}\n", w.path));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", w.path));
        let patch = create_patch(&w.before, &w.after).to_string();
        for line in patch.lines().skip_while(|l| l.starts_with("--- ") || l.starts_with("+++ ")) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pending(dir: &Utf8Path, name: &str, before: &str, after: &str) -> PendingWrite {
        let path = dir.join(name);
        std::fs::write(&path, before).unwrap();
        PendingWrite {
            path,
            before: before.to_string(),
            after: after.to_string(),
        }
    }

    #[test]
    fn failed_rename_restores_files_already_replaced() {
        let td = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        let writes = vec![
            pending(&dir, "A.cs", "old a\n", "new a\n"),
            pending(&dir, "B.cs", "old b\n", "new b\n"),
        ];
        let staged: Vec<NamedTempFile> = writes.iter().map(|w| stage(w).unwrap()).collect();

        let mut calls = 0;
        let err = replace_all(&writes, staged, |tmp, path| {
            calls += 1;
            if calls == 2 {
                return Err(std::io::Error::other("rename refused"));
            }
            tmp.persist(path).map(|_| ()).map_err(|e| e.error)
        })
        .unwrap_err();

        assert_eq!(calls, 2);
        match err {
            PersistenceError::Io { path, .. } => assert_eq!(path, dir.join("B.cs")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(dir.join("A.cs")).unwrap(), "old a\n");
        assert_eq!(std::fs::read_to_string(dir.join("B.cs")).unwrap(), "old b\n");
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn replace_all_writes_every_staged_file() {
        let td = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        let writes = vec![
            pending(&dir, "A.cs", "old a\n", "new a\n"),
            pending(&dir, "B.cs", "old b\n", "new b\n"),
        ];
        let staged: Vec<NamedTempFile> = writes.iter().map(|w| stage(w).unwrap()).collect();

        replace_all(&writes, staged, |tmp, path| {
            tmp.persist(path).map(|_| ()).map_err(|e| e.error)
        })
        .unwrap();

        assert_eq!(std::fs::read_to_string(dir.join("A.cs")).unwrap(), "new a\n");
        assert_eq!(std::fs::read_to_string(dir.join("B.cs")).unwrap(), "new b\n");
    }
}
