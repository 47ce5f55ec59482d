use crate::ids::DocumentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a diagnostic kind, e.g. `UWP001` or `ConvertNamespace`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticId(pub String);

impl DiagnosticId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

/// Half-open byte range `[start, end)` into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start after end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Where a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// Not attached to any source.
    None,
    /// Inside a referenced assembly rather than a source file.
    Metadata { assembly: String },
    /// A range of one document.
    Source { document: DocumentId, span: TextSpan },
}

impl Location {
    pub fn document(&self) -> Option<DocumentId> {
        match self {
            Location::Source { document, .. } => Some(*document),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<TextSpan> {
        match self {
            Location::Source { span, .. } => Some(*span),
            _ => None,
        }
    }

    pub fn is_in_source(&self) -> bool {
        matches!(self, Location::Source { .. })
    }
}

/// A located, typed finding produced by one analyzer pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub message: String,
    pub severity: Severity,
    pub location: Location,
}

impl Diagnostic {
    pub fn in_source(
        id: DiagnosticId,
        severity: Severity,
        document: DocumentId,
        span: TextSpan,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            severity,
            location: Location::Source { document, span },
        }
    }

    /// Sort key used when ordering diagnostics within a document.
    ///
    /// Diagnostics without a source span sort as offset 0.
    pub fn offset(&self) -> usize {
        self.location.span().map(|s| s.start).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_defaults_to_zero_without_span() {
        let d = Diagnostic {
            id: DiagnosticId::new("X"),
            message: String::new(),
            severity: Severity::Warning,
            location: Location::Metadata {
                assembly: "Windows.UI.Xaml".into(),
            },
        };
        assert_eq!(d.offset(), 0);
        assert_eq!(d.location.document(), None);
    }

    #[test]
    fn location_serializes_with_kind_tag() {
        let loc = Location::Source {
            document: DocumentId::new(),
            span: TextSpan::new(3, 9),
        };
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["kind"], "source");
        assert_eq!(json["span"]["start"], 3);
    }

    #[test]
    fn span_contains_is_half_open() {
        let s = TextSpan::new(2, 4);
        assert!(s.contains(2));
        assert!(s.contains(3));
        assert!(!s.contains(4));
        assert_eq!(s.len(), 2);
    }
}
