//! Immutable, forkable project snapshots.
//!
//! A [`ProjectSnapshot`] is a value. Every operation that changes something
//! returns a new snapshot and leaves the receiver untouched. Document and
//! auxiliary-input tables are persistent maps, so a fork shares everything
//! except the entry it replaces.

use crate::error::SnapshotError;
use camino::{Utf8Path, Utf8PathBuf};
use im::OrdMap;
use std::sync::Arc;
use winui_migrate_types::{DocumentId, ProjectId};

/// Kind of a symbol contributed by an auxiliary input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Struct,
    Class,
    Interface,
    Enum,
}

/// A type visible to analysis through an auxiliary input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetadataSymbol {
    pub namespace: String,
    pub name: String,
    pub kind: SymbolKind,
}

impl MetadataSymbol {
    pub fn new(namespace: &str, name: &str, kind: SymbolKind) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// Compilation-only input (reference metadata). Never persisted.
///
/// Inputs are identified by `name`; adding an input with a name already
/// present replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryInput {
    pub name: String,
    pub symbols: Arc<[MetadataSymbol]>,
}

impl AuxiliaryInput {
    pub fn new(name: impl Into<String>, symbols: Vec<MetadataSymbol>) -> Self {
        Self {
            name: name.into(),
            symbols: symbols.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentState {
    path: Utf8PathBuf,
    text: Arc<str>,
}

/// A document resolved against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub path: Utf8PathBuf,
    pub text: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct ProjectSnapshot {
    id: ProjectId,
    version: u64,
    path: Utf8PathBuf,
    project_text: Arc<str>,
    order: Arc<[DocumentId]>,
    documents: OrdMap<DocumentId, DocumentState>,
    auxiliary: OrdMap<String, AuxiliaryInput>,
}

impl ProjectSnapshot {
    /// Build the root snapshot of a new lineage. Document ids are assigned in input order.
    pub fn new(
        path: Utf8PathBuf,
        project_text: impl Into<Arc<str>>,
        documents: Vec<(Utf8PathBuf, String)>,
    ) -> Self {
        let mut order = Vec::with_capacity(documents.len());
        let mut table = OrdMap::new();
        for (doc_path, text) in documents {
            let id = DocumentId::new();
            order.push(id);
            table.insert(
                id,
                DocumentState {
                    path: doc_path,
                    text: text.into(),
                },
            );
        }
        Self {
            id: ProjectId::new(),
            version: 0,
            path,
            project_text: project_text.into(),
            order: order.into(),
            documents: table,
            auxiliary: OrdMap::new(),
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Number of forks between the lineage root and this snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn directory(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(Utf8Path::new("."))
    }

    pub fn project_text(&self) -> &str {
        &self.project_text
    }

    /// Documents present in this snapshot, in lineage order.
    pub fn documents_of(&self) -> Vec<DocumentId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.documents.contains_key(id))
            .collect()
    }

    /// Resolve `id` here. `None` means the document was removed in this fork.
    pub fn resolve_document(&self, id: DocumentId) -> Option<Document> {
        self.documents.get(&id).map(|state| Document {
            id,
            path: state.path.clone(),
            text: Arc::clone(&state.text),
        })
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn auxiliary_inputs(&self) -> impl Iterator<Item = &AuxiliaryInput> {
        self.auxiliary.values()
    }

    pub fn has_auxiliary_inputs(&self) -> bool {
        !self.auxiliary.is_empty()
    }

    pub fn add_auxiliary_inputs(&self, inputs: &[AuxiliaryInput]) -> Self {
        let mut auxiliary = self.auxiliary.clone();
        for input in inputs {
            auxiliary.insert(input.name.clone(), input.clone());
        }
        self.fork(|s| s.auxiliary = auxiliary)
    }

    pub fn remove_auxiliary_inputs(&self, inputs: &[AuxiliaryInput]) -> Self {
        let mut auxiliary = self.auxiliary.clone();
        for input in inputs {
            auxiliary.remove(&input.name);
        }
        self.fork(|s| s.auxiliary = auxiliary)
    }

    /// Replace the content addressed by `id`. The id set is unchanged.
    pub fn with_document_text(
        &self,
        id: DocumentId,
        text: impl Into<Arc<str>>,
    ) -> Result<Self, SnapshotError> {
        let state = self
            .documents
            .get(&id)
            .ok_or(SnapshotError::UnknownDocument(id))?;
        let documents = self.documents.update(
            id,
            DocumentState {
                path: state.path.clone(),
                text: text.into(),
            },
        );
        Ok(self.fork(|s| s.documents = documents))
    }

    pub fn without_document(&self, id: DocumentId) -> Result<Self, SnapshotError> {
        if !self.documents.contains_key(&id) {
            return Err(SnapshotError::UnknownDocument(id));
        }
        let documents = self.documents.without(&id);
        Ok(self.fork(|s| s.documents = documents))
    }

    pub fn with_project_text(&self, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        self.fork(|s| s.project_text = text)
    }

    /// True when both snapshots descend from the same root.
    pub fn same_lineage(&self, other: &ProjectSnapshot) -> bool {
        self.id == other.id
    }

    /// Ids of documents whose content differs from `base` (same lineage assumed).
    pub fn changed_documents(&self, base: &ProjectSnapshot) -> Vec<DocumentId> {
        self.order
            .iter()
            .copied()
            .filter(|id| match (self.documents.get(id), base.documents.get(id)) {
                (Some(mine), Some(theirs)) => {
                    !Arc::ptr_eq(&mine.text, &theirs.text) && mine.text != theirs.text
                }
                _ => false,
            })
            .collect()
    }

    /// Ids present in `base` but missing here.
    pub fn removed_documents(&self, base: &ProjectSnapshot) -> Vec<DocumentId> {
        base.order
            .iter()
            .copied()
            .filter(|id| base.documents.contains_key(id) && !self.documents.contains_key(id))
            .collect()
    }

    fn fork(&self, edit: impl FnOnce(&mut ProjectSnapshot)) -> Self {
        let mut next = self.clone();
        next.version = self.version + 1;
        edit(&mut next);
        next
    }
}
