//! Token reader and schema document resolution.
//!
//! The compiler pulls start/end tag events from a [`TokenReader`]. Prefix
//! bindings live in a [`PrefixStack`] owned by the caller, so each document
//! can be read with its own bindings while sharing one [`NamespaceRegistry`].
//! [`XmlReader`] is the `quick-xml` backed implementation.
//!
//! Included and imported documents are obtained from a [`SchemaResolver`].

use crate::error::ReaderError;
use crate::namespace::{NamespaceId, NamespaceRegistry, PrefixStack};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// Kind of the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeType {
    /// Start tag, including empty-element tags.
    ElementStart,
    /// End tag.
    ElementEnd,
    /// Anything else.
    #[default]
    Other,
}

/// Outcome of advancing the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The reader is positioned on a new node.
    More,
    /// The end of the document was reached.
    Done,
}

/// An attribute of the current start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Name as written, including any prefix.
    pub qualified_name: String,
    /// Name without prefix.
    pub local_name: String,
    /// Namespace of the name; unprefixed attributes have no namespace.
    pub namespace_id: NamespaceId,
    /// Unescaped value.
    pub value: String,
}

/// Pull interface over the tags of an XML document.
pub trait TokenReader {
    /// Opens a document.
    ///
    /// # Arguments
    /// * `input` - Document source
    /// * `location` - Location of the document, used in diagnostics
    ///
    /// # Errors
    /// Returns `ReaderError::Io` if the input cannot be read.
    fn open(&mut self, input: &mut dyn Read, location: &str) -> Result<(), ReaderError>;

    /// Closes the current document.
    fn close(&mut self);

    /// Moves to the next node.
    ///
    /// Namespace declarations on start tags are pushed to `prefixes` and
    /// popped after the matching end tag.
    ///
    /// # Errors
    /// Returns `ReaderError` if the document is not well formed.
    fn advance(
        &mut self,
        prefixes: &mut PrefixStack,
        registry: &mut NamespaceRegistry,
    ) -> Result<Advance, ReaderError>;

    /// Returns the kind of the current node.
    fn node_type(&self) -> NodeType;

    /// Returns the local name of the current tag.
    fn local_name(&self) -> &str;

    /// Returns the namespace of the current tag.
    fn namespace_id(&self) -> NamespaceId;

    /// Returns the namespace URI of the current tag.
    fn namespace_uri(&self) -> &str;

    /// Returns true if the current start tag is an empty-element tag.
    fn is_empty_element(&self) -> bool;

    /// Returns the number of attributes of the current start tag.
    fn num_attributes(&self) -> usize;

    /// Returns an attribute of the current start tag by position.
    fn attribute(&self, index: usize) -> Option<&Attribute>;

    /// Looks up an attribute of the current start tag by name.
    fn lookup_attribute(&self, local_name: &str, namespace_id: NamespaceId) -> Option<&Attribute>;

    /// Returns the line of the current node, starting at 1.
    fn line(&self) -> usize;

    /// Returns the column of the current node, starting at 1.
    fn column(&self) -> usize;
}

/// [`TokenReader`] over an in-memory document parsed with `quick-xml`.
#[derive(Default)]
pub struct XmlReader {
    reader: Option<Reader<Cursor<Vec<u8>>>>,
    location: String,
    buf: Vec<u8>,
    node_type: NodeType,
    local_name: String,
    namespace_id: NamespaceId,
    namespace_uri: String,
    is_empty: bool,
    attributes: Vec<Attribute>,
    position: usize,
    line: usize,
    line_start: usize,
    scopes: Vec<usize>,
    pending_pop: Option<usize>,
}

impl XmlReader {
    /// Creates a reader with no open document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the location of the open document.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    fn reset_node(&mut self) {
        self.node_type = NodeType::Other;
        self.local_name.clear();
        self.namespace_id = NamespaceId::NONE;
        self.namespace_uri.clear();
        self.is_empty = false;
        self.attributes.clear();
    }

    fn document(&self) -> &[u8] {
        self.reader
            .as_ref()
            .map_or(&[][..], |reader| reader.get_ref().get_ref().as_slice())
    }

    /// Moves the current node position, counting the line breaks passed.
    ///
    /// Only the bytes between the old and new position are scanned, so the
    /// cost over a whole document is linear. Moving backwards rescans from
    /// the start.
    fn move_to(&mut self, position: usize) {
        let position = position.min(self.document().len());
        if position < self.position {
            (self.position, self.line, self.line_start) = (0, 1, 0);
        }
        let (mut line, mut line_start) = (self.line, self.line_start);
        let from = self.position;
        for (offset, &b) in self.document()[from..position].iter().enumerate() {
            if b == b'\n' {
                line += 1;
                line_start = from + offset + 1;
            }
        }
        (self.position, self.line, self.line_start) = (position, line, line_start);
    }

    /// Returns the byte offset of the first `<` at or after `from`.
    fn tag_offset(&self, from: usize) -> usize {
        let document = self.document();
        let from = from.min(document.len());
        document[from..]
            .iter()
            .position(|&b| b == b'<')
            .map_or(from, |offset| from + offset)
    }

    fn read_start(
        &mut self,
        e: &BytesStart<'_>,
        prefixes: &mut PrefixStack,
        registry: &mut NamespaceRegistry,
    ) -> Result<usize, ReaderError> {
        let mark = prefixes.len();
        let mut raw = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = std::str::from_utf8(&attr.value)?;
            let value = quick_xml::escape::unescape(value)?.into_owned();
            if key == "xmlns" {
                prefixes.push_prefix(registry, "", &value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                prefixes.push_prefix(registry, prefix, &value);
            }
            raw.push((key, value));
        }

        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let (prefix, local) = split_qname(&name);
        self.local_name = local.to_string();
        self.namespace_id = prefixes.lookup_namespace_id(prefix.unwrap_or(""));
        self.namespace_uri = registry.lookup(self.namespace_id).to_string();

        for (key, value) in raw {
            let (prefix, local) = split_qname(&key);
            let namespace_id = match prefix {
                _ if key == "xmlns" => NamespaceId::XMLNS,
                Some(prefix) => prefixes.lookup_namespace_id(prefix),
                None => NamespaceId::NONE,
            };
            self.attributes.push(Attribute {
                local_name: local.to_string(),
                qualified_name: key.clone(),
                namespace_id,
                value,
            });
        }
        Ok(mark)
    }
}

/// Splits `prefix:local` into its parts.
fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

impl TokenReader for XmlReader {
    fn open(&mut self, input: &mut dyn Read, location: &str) -> Result<(), ReaderError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let mut reader = Reader::from_reader(Cursor::new(bytes));
        reader.config_mut().trim_text(true);
        self.reader = Some(reader);
        self.location = location.to_string();
        self.scopes.clear();
        self.pending_pop = None;
        (self.position, self.line, self.line_start) = (0, 1, 0);
        self.reset_node();
        Ok(())
    }

    fn close(&mut self) {
        self.reader = None;
        self.scopes.clear();
        self.pending_pop = None;
        (self.position, self.line, self.line_start) = (0, 1, 0);
        self.reset_node();
    }

    fn advance(
        &mut self,
        prefixes: &mut PrefixStack,
        registry: &mut NamespaceRegistry,
    ) -> Result<Advance, ReaderError> {
        if let Some(mark) = self.pending_pop.take() {
            prefixes.truncate(mark);
        }
        self.reset_node();

        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        let result = loop {
            let Some(reader) = self.reader.as_mut() else {
                break Err(ReaderError::NotOpen);
            };
            let before = reader.buffer_position() as usize;
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event.into_owned(),
                Err(e) => {
                    let position = reader.error_position() as usize;
                    self.move_to(position);
                    break Err(ReaderError::Xml(e));
                }
            };
            let position = self.tag_offset(before);
            self.move_to(position);

            match event {
                Event::Start(e) => {
                    let mark = self.read_start(&e, prefixes, registry)?;
                    self.scopes.push(mark);
                    self.node_type = NodeType::ElementStart;
                    break Ok(Advance::More);
                }
                Event::Empty(e) => {
                    let mark = self.read_start(&e, prefixes, registry)?;
                    self.pending_pop = Some(mark);
                    self.is_empty = true;
                    self.node_type = NodeType::ElementStart;
                    break Ok(Advance::More);
                }
                Event::End(e) => {
                    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                    let (prefix, local) = split_qname(&name);
                    self.local_name = local.to_string();
                    self.namespace_id = prefixes.lookup_namespace_id(prefix.unwrap_or(""));
                    self.namespace_uri = registry.lookup(self.namespace_id).to_string();
                    self.pending_pop = self.scopes.pop();
                    self.node_type = NodeType::ElementEnd;
                    break Ok(Advance::More);
                }
                Event::Eof => break Ok(Advance::Done),
                _ => buf.clear(),
            }
        };
        self.buf = buf;
        result
    }

    fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn local_name(&self) -> &str {
        &self.local_name
    }

    fn namespace_id(&self) -> NamespaceId {
        self.namespace_id
    }

    fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    fn is_empty_element(&self) -> bool {
        self.is_empty
    }

    fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    fn lookup_attribute(&self, local_name: &str, namespace_id: NamespaceId) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attr| attr.local_name == local_name && attr.namespace_id == namespace_id)
    }

    fn line(&self) -> usize {
        self.line.max(1)
    }

    fn column(&self) -> usize {
        self.position.saturating_sub(self.line_start) + 1
    }
}

/// Supplies the documents named by `<include>` and `<import>`.
pub trait SchemaResolver {
    /// Opens the document at `location`.
    ///
    /// # Arguments
    /// * `location` - Value of the `schemaLocation` attribute
    /// * `target_namespace` - Target namespace URI the document must declare
    ///
    /// # Returns
    /// The document source, or `None` if it cannot be found.
    fn resolve(&mut self, location: &str, target_namespace: &str) -> Option<Box<dyn Read>>;
}

impl<F> SchemaResolver for F
where
    F: FnMut(&str, &str) -> Option<Box<dyn Read>>,
{
    fn resolve(&mut self, location: &str, target_namespace: &str) -> Option<Box<dyn Read>> {
        self(location, target_namespace)
    }
}

/// Resolves locations as file paths relative to a base directory.
#[derive(Debug, Clone, Default)]
pub struct FsResolver {
    base: PathBuf,
}

impl FsResolver {
    /// Creates a resolver for paths relative to `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl SchemaResolver for FsResolver {
    fn resolve(&mut self, location: &str, _target_namespace: &str) -> Option<Box<dyn Read>> {
        let path = Path::new(location);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        };
        match File::open(&path) {
            Ok(file) => Some(Box::new(BufReader::new(file))),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot open schema");
                None
            }
        }
    }
}

/// Resolves locations from an in-memory document map.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    documents: HashMap<String, String>,
}

impl MemoryResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document.
    pub fn insert(&mut self, location: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(location.into(), text.into());
    }

    /// Adds a document, builder style.
    #[must_use]
    pub fn with(mut self, location: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(location, text);
        self
    }
}

impl SchemaResolver for MemoryResolver {
    fn resolve(&mut self, location: &str, _target_namespace: &str) -> Option<Box<dyn Read>> {
        self.documents
            .get(location)
            .map(|text| Box::new(Cursor::new(text.clone().into_bytes())) as Box<dyn Read>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(text: &str) -> XmlReader {
        let mut reader = XmlReader::new();
        reader
            .open(&mut text.as_bytes(), "test.xsd")
            .expect("open failed");
        reader
    }

    #[test]
    fn test_reads_tags_and_namespaces() {
        let mut registry = NamespaceRegistry::new();
        let mut prefixes = PrefixStack::new();
        let mut reader = open(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t">
  <xs:element name="a" type="t:A"/>
</xs:schema>"#,
        );

        assert_eq!(
            reader
                .advance(&mut prefixes, &mut registry)
                .expect("advance"),
            Advance::More
        );
        assert_eq!(reader.node_type(), NodeType::ElementStart);
        assert_eq!(reader.local_name(), "schema");
        assert_eq!(reader.namespace_id(), NamespaceId::XMLSCHEMA);
        assert_eq!(reader.num_attributes(), 2);
        assert_eq!(
            reader
                .attribute(0)
                .expect("attribute")
                .namespace_id,
            NamespaceId::XMLNS
        );

        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert_eq!(reader.local_name(), "element");
        assert!(reader.is_empty_element());
        assert_eq!(reader.line(), 2);
        assert_eq!(reader.column(), 3);
        let attr = reader
            .lookup_attribute("type", NamespaceId::NONE)
            .expect("type attribute");
        assert_eq!(attr.value, "t:A");

        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert_eq!(reader.node_type(), NodeType::ElementEnd);
        assert_eq!(reader.local_name(), "schema");
        assert_eq!(
            reader
                .advance(&mut prefixes, &mut registry)
                .expect("advance"),
            Advance::Done
        );
        assert!(prefixes.is_empty());
    }

    #[test]
    fn test_nested_bindings_go_out_of_scope() {
        let mut registry = NamespaceRegistry::new();
        let mut prefixes = PrefixStack::new();
        let mut reader = open(r#"<a xmlns:p="urn:one"><b xmlns:p="urn:two"/><p:c/></a>"#);

        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert_eq!(registry.lookup(prefixes.lookup_namespace_id("p")), "urn:two");
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert_eq!(reader.local_name(), "c");
        assert_eq!(reader.namespace_uri(), "urn:one");
    }

    #[test]
    fn test_unescapes_attribute_values() {
        let mut registry = NamespaceRegistry::new();
        let mut prefixes = PrefixStack::new();
        let mut reader = open(r#"<a v="x &amp; y"/>"#);
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert_eq!(
            reader
                .lookup_attribute("v", NamespaceId::NONE)
                .expect("attribute")
                .value,
            "x & y"
        );
    }

    #[test]
    fn test_reports_malformed_document() {
        let mut registry = NamespaceRegistry::new();
        let mut prefixes = PrefixStack::new();
        let mut reader = open("<a><b></a>");
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert!(reader.advance(&mut prefixes, &mut registry).is_err());
    }

    #[test]
    fn test_tracks_line_and_column_across_tags() {
        let mut registry = NamespaceRegistry::new();
        let mut prefixes = PrefixStack::new();
        let mut reader = open("<a>\n  <b/>\n\n    <c>\n</c><d/></a>");

        let mut positions = Vec::new();
        while reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance")
            == Advance::More
        {
            positions.push((reader.local_name().to_string(), reader.line(), reader.column()));
        }
        let expected = [("a", 1, 1), ("b", 2, 3), ("c", 4, 5), ("c", 5, 1), ("d", 5, 5), ("a", 5, 9)];
        let expected: Vec<_> = expected
            .iter()
            .map(|&(name, line, column)| (name.to_string(), line, column))
            .collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_line_count_is_linear_in_document_size() {
        let mut registry = NamespaceRegistry::new();
        let mut prefixes = PrefixStack::new();
        let count = 20_000;
        let mut text = String::from("<a>\n");
        for _ in 0..count {
            text.push_str("<b/>\n");
        }
        text.push_str("</a>");
        let mut reader = open(&text);

        let mut last_line = 0;
        while reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance")
            == Advance::More
        {
            last_line = reader.line();
            assert_eq!(reader.column(), 1);
        }
        assert_eq!(last_line, count + 2);
    }

    #[test]
    fn test_reports_position_of_malformed_tag() {
        let mut registry = NamespaceRegistry::new();
        let mut prefixes = PrefixStack::new();
        let mut reader = open("<a>\n  <b>\n</a>");
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert_eq!((reader.line(), reader.column()), (2, 3));
        assert!(reader.advance(&mut prefixes, &mut registry).is_err());
        assert!((2..=3).contains(&reader.line()));

        reader.open(&mut "<x/>".as_bytes(), "next.xsd").expect("open");
        reader
            .advance(&mut prefixes, &mut registry)
            .expect("advance");
        assert_eq!((reader.line(), reader.column()), (1, 1));
    }

    #[test]
    fn test_memory_resolver() {
        let mut resolver = MemoryResolver::new().with("b.xsd", "<schema/>");
        let mut text = String::new();
        resolver
            .resolve("b.xsd", "urn:b")
            .expect("document")
            .read_to_string(&mut text)
            .expect("read");
        assert_eq!(text, "<schema/>");
        assert!(resolver.resolve("c.xsd", "urn:b").is_none());
    }

    #[test]
    fn test_closure_resolver() {
        let mut calls = Vec::new();
        let mut resolver = |location: &str, ns: &str| -> Option<Box<dyn Read>> {
            calls.push(format!("{ns} {location}"));
            None
        };
        assert!(SchemaResolver::resolve(&mut resolver, "x.xsd", "urn:x").is_none());
        assert_eq!(calls, vec!["urn:x x.xsd".to_string()]);
    }
}
