//! Fix actions: deferred, verifiable text edits against one document.

use crate::error::FixApplicationError;
use winui_migrate_types::{Diagnostic, DocumentId, TextSpan};
use winui_migrate_workspace::{Document, ProjectSnapshot};

/// Replace `span` with `replacement`, but only if it still reads `expected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: TextSpan,
    pub expected: String,
    pub replacement: String,
}

impl TextEdit {
    /// Edit whose precondition is the current text under `span`.
    pub fn replace(text: &str, span: TextSpan, replacement: impl Into<String>) -> Option<Self> {
        let expected = text.get(span.start..span.end)?;
        Some(Self {
            span,
            expected: expected.to_string(),
            replacement: replacement.into(),
        })
    }
}

/// A proposed fix. Nothing changes until [`FixAction::apply`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixAction {
    pub title: String,
    pub equivalence_key: String,
    pub document: DocumentId,
    pub edits: Vec<TextEdit>,
}

impl FixAction {
    /// Produce the snapshot that results from this fix.
    ///
    /// Every edit is checked against the current document text first; a
    /// stale, overlapping or out-of-range edit fails the whole action.
    pub fn apply(&self, snapshot: &ProjectSnapshot) -> Result<ProjectSnapshot, FixApplicationError> {
        let doc = snapshot
            .resolve_document(self.document)
            .ok_or(FixApplicationError::DocumentMissing(self.document))?;
        let text: &str = &doc.text;

        let mut edits: Vec<&TextEdit> = self.edits.iter().collect();
        edits.sort_by_key(|e| (e.span.start, e.span.end));
        for pair in edits.windows(2) {
            if pair[1].span.start < pair[0].span.end {
                return Err(FixApplicationError::OverlappingEdits { span: pair[1].span });
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for edit in edits {
            let found = text
                .get(edit.span.start..edit.span.end)
                .ok_or(FixApplicationError::InvalidSpan { span: edit.span })?;
            if found != edit.expected {
                return Err(FixApplicationError::StaleEdit {
                    span: edit.span,
                    expected: edit.expected.clone(),
                    found: found.to_string(),
                });
            }
            out.push_str(&text[cursor..edit.span.start]);
            out.push_str(&edit.replacement);
            cursor = edit.span.end;
        }
        out.push_str(&text[cursor..]);

        Ok(snapshot.with_document_text(self.document, out)?)
    }
}

/// What a code fix sees when asked for actions: one document and one
/// diagnostic. Actions are collected through [`FixContext::register`].
pub struct FixContext<'a> {
    pub document: &'a Document,
    pub diagnostic: &'a Diagnostic,
    actions: Vec<FixAction>,
}

impl<'a> FixContext<'a> {
    pub fn new(document: &'a Document, diagnostic: &'a Diagnostic) -> Self {
        Self {
            document,
            diagnostic,
            actions: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.document.text
    }

    /// The diagnostic's span, if it points into this document.
    pub fn span(&self) -> Option<TextSpan> {
        match self.diagnostic.location.document() {
            Some(id) if id == self.document.id => self.diagnostic.location.span(),
            _ => None,
        }
    }

    pub fn register(&mut self, action: FixAction) {
        self.actions.push(action);
    }

    /// Actions in registration order.
    pub fn into_actions(self) -> Vec<FixAction> {
        self.actions
    }
}
