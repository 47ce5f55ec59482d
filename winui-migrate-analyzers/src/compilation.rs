//! Compilation model built from one project snapshot.
//!
//! Holds the token stream and the import scope of every document, plus a
//! symbol table fed exclusively by the snapshot's auxiliary inputs. Without
//! auxiliary inputs nothing resolves to a framework type.

use crate::error::AnalysisError;
use crate::syntax::{self, Token, TokenKind};
use camino::Utf8PathBuf;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use winui_migrate_types::DocumentId;
use winui_migrate_workspace::{MetadataSymbol, ProjectSnapshot};

const TYPE_KEYWORDS: &[&str] = &["class", "struct", "interface", "enum", "record"];

#[derive(Debug, Clone)]
pub struct SyntaxDocument {
    pub id: DocumentId,
    pub path: Utf8PathBuf,
    pub text: Arc<str>,
    pub tokens: Vec<Token>,
    /// Namespaces imported with `using N;`.
    pub usings: Vec<String>,
    /// `using Alias = Target;`
    pub aliases: BTreeMap<String, String>,
    /// Namespaces declared in the file, outermost first.
    pub namespaces: Vec<String>,
}

impl SyntaxDocument {
    fn parse(id: DocumentId, path: Utf8PathBuf, text: Arc<str>) -> Result<Self, AnalysisError> {
        let tokens = syntax::tokenize(&text).map_err(|e| AnalysisError::Syntax {
            path: path.clone(),
            offset: e.offset,
            message: e.message,
        })?;
        let mut doc = Self {
            id,
            path,
            text,
            tokens,
            usings: Vec::new(),
            aliases: BTreeMap::new(),
            namespaces: Vec::new(),
        };
        doc.scan_directives();
        Ok(doc)
    }

    pub fn src(&self) -> &str {
        &self.text
    }

    fn scan_directives(&mut self) {
        let src = Arc::clone(&self.text);
        let names = syntax::dotted_names(&src, &self.tokens);
        for (n, name) in names.iter().enumerate() {
            let head = self.tokens[name.segments[0]];
            let Some(next) = names.get(n + 1) else { continue };
            let after = self.tokens.get(next.next_token());
            let ends_statement = after.is_some_and(|t| t.is_punct(&src, ';'));

            if head.is_ident(&src, "using") && !name.is_qualified() {
                let directly_after = next.segments[0] == name.next_token();
                if directly_after && ends_statement {
                    self.usings.push(next.text(&src, &self.tokens));
                    continue;
                }
                // using Alias = A.B.C;
                let eq = self.tokens.get(name.next_token() + 1);
                if !next.is_qualified()
                    && directly_after
                    && eq.is_some_and(|t| t.is_punct(&src, '='))
                    && let Some(target) = names.get(n + 2)
                    && target.segments[0] == name.next_token() + 2
                    && self
                        .tokens
                        .get(target.next_token())
                        .is_some_and(|t| t.is_punct(&src, ';'))
                {
                    self.aliases.insert(
                        next.text(&src, &self.tokens),
                        target.text(&src, &self.tokens),
                    );
                }
            } else if head.is_ident(&src, "namespace")
                && !name.is_qualified()
                && next.segments[0] == name.next_token()
            {
                self.namespaces.push(next.text(&src, &self.tokens));
            }
        }
    }

    /// Simple names of types declared in this document, with the namespace
    /// most recently declared before each one.
    fn declared_types(&self) -> Vec<(String, String)> {
        let src = self.src();
        let mut current = String::new();
        let mut out = Vec::new();
        for (i, t) in self.tokens.iter().enumerate() {
            if t.kind != TokenKind::Ident {
                continue;
            }
            let word = t.text(src);
            let Some(next) = self.tokens.get(i + 1) else { continue };
            if word == "namespace" {
                current = syntax::dotted_names(src, &self.tokens[i + 1..])
                    .first()
                    .map(|n| n.text(src, &self.tokens[i + 1..]))
                    .unwrap_or_default();
            } else if TYPE_KEYWORDS.contains(&word) && next.kind == TokenKind::Ident {
                out.push((current.clone(), next.text(src).to_string()));
            }
        }
        out
    }

    /// Namespaces whose members are visible by simple name, excluding
    /// imported ones: the declared namespaces, their parents and the
    /// global namespace.
    fn enclosing_namespaces(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::from([String::new()]);
        for ns in &self.namespaces {
            let mut prefix = String::new();
            for part in ns.split('.') {
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(part);
                out.insert(prefix.clone());
            }
        }
        out
    }
}

pub struct Compilation {
    documents: Vec<SyntaxDocument>,
    symbols: Vec<(String, MetadataSymbol)>,
    by_name: BTreeMap<String, Vec<usize>>,
    by_qualified_name: BTreeMap<String, usize>,
    source_types: BTreeSet<(String, String)>,
}

impl Compilation {
    /// Tokenize every document and index the auxiliary inputs.
    pub fn build(snapshot: &ProjectSnapshot) -> Result<Self, AnalysisError> {
        let mut documents = Vec::with_capacity(snapshot.document_count());
        for id in snapshot.documents_of() {
            let Some(doc) = snapshot.resolve_document(id) else { continue };
            documents.push(SyntaxDocument::parse(doc.id, doc.path, doc.text)?);
        }

        let mut symbols = Vec::new();
        let mut by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_qualified_name = BTreeMap::new();
        for input in snapshot.auxiliary_inputs() {
            for symbol in input.symbols.iter() {
                let qualified = symbol.qualified_name();
                if by_qualified_name.contains_key(&qualified) {
                    continue;
                }
                let index = symbols.len();
                by_name.entry(symbol.name.clone()).or_default().push(index);
                by_qualified_name.insert(qualified, index);
                symbols.push((input.name.clone(), symbol.clone()));
            }
        }

        let source_types = documents
            .iter()
            .flat_map(SyntaxDocument::declared_types)
            .collect();

        tracing::debug!(
            documents = documents.len(),
            symbols = symbols.len(),
            "compilation built"
        );
        Ok(Self {
            documents,
            symbols,
            by_name,
            by_qualified_name,
            source_types,
        })
    }

    pub fn documents(&self) -> &[SyntaxDocument] {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&SyntaxDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn has_metadata(&self) -> bool {
        !self.symbols.is_empty()
    }

    /// Look up a fully qualified type name among metadata symbols.
    pub fn resolve_qualified(&self, qualified: &str) -> Option<&MetadataSymbol> {
        self.by_qualified_name
            .get(qualified)
            .map(|&i| &self.symbols[i].1)
    }

    /// Name of the auxiliary input a metadata symbol came from.
    pub fn assembly_of(&self, symbol: &MetadataSymbol) -> Option<&str> {
        self.by_qualified_name
            .get(&symbol.qualified_name())
            .map(|&i| self.symbols[i].0.as_str())
    }

    /// Resolve a simple (or aliased) type name as seen from `document`.
    ///
    /// Returns `None` for source-declared types, unknown names and names
    /// that are ambiguous between imported namespaces.
    pub fn resolve_type(&self, document: &SyntaxDocument, name: &str) -> Option<&MetadataSymbol> {
        if let Some(target) = document.aliases.get(name) {
            return self.resolve_qualified(target);
        }

        let enclosing = document.enclosing_namespaces();
        let in_source = |ns: &str| self.source_types.contains(&(ns.to_string(), name.to_string()));
        if enclosing.iter().any(|ns| in_source(ns)) {
            return None;
        }

        let candidates = self.by_name.get(name)?;
        let visible: Vec<&MetadataSymbol> = candidates
            .iter()
            .map(|&i| &self.symbols[i].1)
            .filter(|s| enclosing.contains(&s.namespace) || document.usings.contains(&s.namespace))
            .collect();
        if document.usings.iter().any(|ns| in_source(ns)) {
            return None;
        }
        match visible.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}
