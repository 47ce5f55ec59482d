//! Formatting-preserving access to an MSBuild project file.
//!
//! The raw text is the source of truth. `quick-xml` is only used to locate
//! elements; edits splice the raw text and re-index, so whitespace, comments
//! and attribute order outside the edited range survive byte for byte.

use crate::error::RootElementError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use quick_xml::events::{BytesStart, Event};
use quick_xml::escape::escape;
use quick_xml::reader::Reader;
use tracing::debug;
use winui_migrate_types::TextSpan;

/// One located element of the project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub parent: Option<usize>,
    /// Whole element, start tag through end tag.
    pub span: TextSpan,
    /// The start tag (or the whole empty element).
    pub start_tag: TextSpan,
    /// Content between start and end tag; `None` for `<X/>`.
    pub inner: Option<TextSpan>,
    /// Unescaped text content when the element has no child elements.
    pub text: Option<String>,
}

impl ElementNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    pub index: usize,
    pub name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyElement {
    pub index: usize,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportElement {
    pub index: usize,
    pub project: String,
}

#[derive(Debug, Clone)]
pub struct ProjectRootElement {
    path: Utf8PathBuf,
    text: String,
    elements: Vec<ElementNode>,
}

impl ProjectRootElement {
    /// Open a project file. Fails with `NotFound` when the path does not resolve to a file.
    pub fn open(path: &Utf8Path) -> Result<Self, RootElementError> {
        if !path.is_file() {
            return Err(RootElementError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| RootElementError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, text)
    }

    pub fn parse(path: &Utf8Path, text: impl Into<String>) -> Result<Self, RootElementError> {
        let text = text.into();
        let elements = index_elements(&text).map_err(|message| RootElementError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path, elements = elements.len(), "indexed project xml");
        Ok(Self {
            path: path.to_path_buf(),
            text,
            elements,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn raw_text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn elements(&self) -> &[ElementNode] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Result<&ElementNode, RootElementError> {
        self.elements
            .get(index)
            .ok_or(RootElementError::NoSuchElement { index })
    }

    fn children<'a>(&'a self, parent: usize) -> impl Iterator<Item = (usize, &'a ElementNode)> + 'a {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.parent == Some(parent))
    }

    fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (usize, &'a ElementNode)> + 'a {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.name == name)
    }

    /// `Include` values of every `<Compile>` item, in file order.
    pub fn compile_items(&self) -> Vec<String> {
        self.named("Compile")
            .filter_map(|(_, e)| e.attribute("Include").map(str::to_string))
            .collect()
    }

    /// `Remove` values of every `<Compile>` item, in file order.
    pub fn compile_removes(&self) -> Vec<String> {
        self.named("Compile")
            .filter_map(|(_, e)| e.attribute("Remove").map(str::to_string))
            .collect()
    }

    /// `<Project Sdk="...">` roots get implicit compile items.
    pub fn is_sdk_style(&self) -> bool {
        self.elements
            .first()
            .is_some_and(|e| e.name == "Project" && e.attribute("Sdk").is_some())
    }

    /// Value of the last property named `name`, ignoring case.
    pub fn property_value(&self, name: &str) -> Option<String> {
        self.properties()
            .into_iter()
            .rev()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value)
    }

    /// Whether sources below the project directory are compiled without
    /// being listed: SDK-style unless `EnableDefaultCompileItems` is false.
    pub fn default_compile_items_enabled(&self) -> bool {
        self.is_sdk_style()
            && !self
                .property_value("EnableDefaultCompileItems")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("false"))
    }

    pub fn package_references(&self) -> Vec<PackageReference> {
        self.named("PackageReference")
            .filter_map(|(index, e)| {
                let name = e.attribute("Include").or_else(|| e.attribute("Update"))?;
                let version = e.attribute("Version").map(str::to_string).or_else(|| {
                    self.children(index)
                        .find(|(_, c)| c.name == "Version")
                        .and_then(|(_, c)| c.text.clone())
                });
                Some(PackageReference {
                    index,
                    name: name.to_string(),
                    version,
                })
            })
            .collect()
    }

    /// Children of every `<PropertyGroup>`.
    pub fn properties(&self) -> Vec<PropertyElement> {
        self.named("PropertyGroup")
            .flat_map(|(group, _)| self.children(group))
            .map(|(index, e)| PropertyElement {
                index,
                name: e.name.clone(),
                value: e.text.clone().unwrap_or_default(),
            })
            .collect()
    }

    pub fn imports(&self) -> Vec<ImportElement> {
        self.named("Import")
            .filter_map(|(index, e)| {
                e.attribute("Project").map(|p| ImportElement {
                    index,
                    project: p.to_string(),
                })
            })
            .collect()
    }

    /// Remove an element. A line holding nothing else is removed entirely.
    pub fn remove_element(&mut self, index: usize) -> Result<(), RootElementError> {
        let span = self.element(index)?.span;
        let bytes = self.text.as_bytes();

        let mut start = span.start;
        while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
            start -= 1;
        }
        let line_start = start == 0 || bytes[start - 1] == b'\n';

        let mut end = span.end;
        while end < bytes.len() && matches!(bytes[end], b' ' | b'\t' | b'\r') {
            end += 1;
        }
        let line_end = end == bytes.len() || bytes[end] == b'\n';

        let range = if line_start && line_end {
            start..(end + 1).min(bytes.len())
        } else {
            span.start..span.end
        };
        self.splice(range.start, range.end, "")
    }

    /// Set (or add) an attribute on an element's start tag.
    pub fn set_attribute(
        &mut self,
        index: usize,
        name: &str,
        value: &str,
    ) -> Result<(), RootElementError> {
        let tag = self.element(index)?.start_tag;
        let escaped = escape(value).into_owned();
        match find_attribute_value(&self.text[tag.start..tag.end], name) {
            Some((value_start, value_end)) => {
                self.splice(tag.start + value_start, tag.start + value_end, &escaped)
            }
            None => {
                let raw = &self.text[tag.start..tag.end];
                let close = if raw.ends_with("/>") { 2 } else { 1 };
                let mut at = tag.end - close;
                while at > tag.start && self.text.as_bytes()[at - 1] == b' ' {
                    at -= 1;
                }
                self.splice(at, at, &format!(" {}=\"{}\"", name, escaped))
            }
        }
    }

    /// Point a `<PackageReference>` at a different package id.
    pub fn rename_package(&mut self, index: usize, name: &str) -> Result<(), RootElementError> {
        let attr = match self.element(index)?.attribute("Include") {
            Some(_) => "Include",
            None => "Update",
        };
        self.set_attribute(index, attr, name)
    }

    /// Set a package version where the reference already keeps it: the
    /// `Version` attribute, a `<Version>` child, or a new attribute.
    pub fn set_package_version(&mut self, index: usize, version: &str) -> Result<(), RootElementError> {
        let child = match self.element(index)?.attribute("Version") {
            Some(_) => None,
            None => self
                .children(index)
                .find(|(_, c)| c.name == "Version")
                .map(|(i, _)| i),
        };
        match child {
            Some(child) => self.set_text(child, version),
            None => self.set_attribute(index, "Version", version),
        }
    }

    /// Replace the text content of an element that has a start and end tag.
    pub fn set_text(&mut self, index: usize, value: &str) -> Result<(), RootElementError> {
        let node = self.element(index)?;
        let Some(inner) = node.inner else {
            return Err(RootElementError::Parse {
                path: self.path.clone(),
                message: format!("<{}/> has no content to replace", node.name),
            });
        };
        let escaped = escape(value).into_owned();
        self.splice(inner.start, inner.end, &escaped)
    }

    fn splice(&mut self, start: usize, end: usize, with: &str) -> Result<(), RootElementError> {
        let mut next = String::with_capacity(self.text.len() + with.len());
        next.push_str(&self.text[..start]);
        next.push_str(with);
        next.push_str(&self.text[end..]);
        self.elements = index_elements(&next).map_err(|message| RootElementError::Parse {
            path: self.path.clone(),
            message,
        })?;
        self.text = next;
        Ok(())
    }
}

/// Byte range (relative to `tag`) of the value of attribute `name`.
/// Names match ASCII case-insensitively, like [`ElementNode::attribute`].
fn find_attribute_value(tag: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = tag.as_bytes();
    let wanted = name.as_bytes();
    if wanted.is_empty() || bytes.len() < wanted.len() {
        return None;
    }
    for at in 1..=bytes.len() - wanted.len() {
        if !bytes[at - 1].is_ascii_whitespace() || !bytes[at..at + wanted.len()].eq_ignore_ascii_case(wanted) {
            continue;
        }
        let mut i = at + wanted.len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let quote = *bytes.get(i)?;
        if quote != b'"' && quote != b'\'' {
            continue;
        }
        let value_start = i + 1;
        let value_len = tag[value_start..].find(quote as char)?;
        return Some((value_start, value_start + value_len));
    }
    None
}

struct Open {
    index: usize,
    has_children: bool,
    text: String,
}

fn index_elements(text: &str) -> Result<Vec<ElementNode>, String> {
    let mut reader = Reader::from_str(text);
    let mut elements: Vec<ElementNode> = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut roots = 0usize;

    loop {
        let before = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(format!("{} at byte {}", e, reader.error_position())),
        };
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(start) | Event::Empty(start)
                if stack.is_empty() && roots > 0 =>
            {
                return Err(format!(
                    "second root element <{}>",
                    String::from_utf8_lossy(start.name().as_ref())
                ));
            }
            Event::Start(start) => {
                let node = new_node(&start, stack.last().map(|o| o.index), before, after)?;
                if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                } else {
                    roots += 1;
                }
                elements.push(node);
                stack.push(Open {
                    index: elements.len() - 1,
                    has_children: false,
                    text: String::new(),
                });
            }
            Event::Empty(start) => {
                let node = new_node(&start, stack.last().map(|o| o.index), before, after)?;
                if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                } else {
                    roots += 1;
                }
                elements.push(node);
            }
            Event::Text(t) => {
                if let Some(open) = stack.last_mut() {
                    let unescaped = t.unescape().map_err(|e| e.to_string())?;
                    open.text.push_str(&unescaped);
                }
            }
            Event::CData(c) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                let open = stack.pop().ok_or_else(|| "unbalanced end tag".to_string())?;
                let node = &mut elements[open.index];
                node.span = TextSpan::new(node.span.start, after);
                node.inner = Some(TextSpan::new(node.start_tag.end, before));
                if !open.has_children {
                    node.text = Some(open.text.trim().to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", elements[open.index].name));
    }
    if roots == 0 {
        return Err("no root element".to_string());
    }
    Ok(elements)
}

fn new_node(
    start: &BytesStart<'_>,
    parent: Option<usize>,
    begin: usize,
    end: usize,
) -> Result<ElementNode, String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        attributes.push((key, value));
    }
    Ok(ElementNode {
        name,
        attributes,
        parent,
        span: TextSpan::new(begin, end),
        start_tag: TextSpan::new(begin, end),
        inner: None,
        text: None,
    })
}
