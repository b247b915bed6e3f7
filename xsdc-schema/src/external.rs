//! Documents taking part in one compile.
//!
//! The top-level document and every document reached through `<include>` or
//! `<import>` get an [`ExternalSchemaInfo`]. They are kept in a
//! [`SchemaWorklist`] in discovery order and parsed one after another. Each
//! entry remembers the index of the document that named it, which is how a
//! re-inclusion along the same ancestor chain is told apart from a diamond.

use crate::namespace::{NamespaceId, NamespaceRegistry, PrefixStack};

/// How a document entered the compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// The document passed to the parser.
    TopLevel,
    /// Named by `<include>`; shares the target namespace of its parent.
    Include,
    /// Named by `<import>`; declares the namespace given on the tag.
    Import,
}

/// One document of the compile.
#[derive(Debug, Clone)]
pub struct ExternalSchemaInfo {
    kind: SchemaKind,
    parent: Option<usize>,
    location: String,
    target_namespace: NamespaceId,
    /// Prefix bindings in scope while the document is read.
    pub prefixes: PrefixStack,
}

impl ExternalSchemaInfo {
    /// Creates the entry of the top-level document.
    #[must_use]
    pub fn top_level(location: impl Into<String>) -> Self {
        let mut prefixes = PrefixStack::new();
        prefixes.push_id("", NamespaceId::NONE);
        Self {
            kind: SchemaKind::TopLevel,
            parent: None,
            location: location.into(),
            target_namespace: NamespaceId::NONE,
            prefixes,
        }
    }

    /// Creates the entry of an included or imported document.
    ///
    /// # Arguments
    /// * `kind` - Include or import
    /// * `parent` - Worklist index of the naming document
    /// * `location` - Value of `schemaLocation`
    /// * `target_uri` - Target namespace the document must declare
    /// * `registry` - Session namespace registry
    pub fn nested(
        kind: SchemaKind,
        parent: usize,
        location: impl Into<String>,
        target_uri: &str,
        registry: &mut NamespaceRegistry,
    ) -> Self {
        let mut prefixes = PrefixStack::new();
        let target_namespace = prefixes.push_prefix(registry, "", target_uri);
        Self {
            kind,
            parent: Some(parent),
            location: location.into(),
            target_namespace,
            prefixes,
        }
    }

    /// Returns how the document entered the compile.
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Returns the worklist index of the naming document.
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Returns the document location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the target namespace.
    #[must_use]
    pub const fn target_namespace(&self) -> NamespaceId {
        self.target_namespace
    }

    /// Sets the target namespace.
    ///
    /// # Returns
    /// `false` if a different target namespace is already set.
    pub fn set_target_namespace(&mut self, namespace_id: NamespaceId) -> bool {
        if !self.target_namespace.is_none() && self.target_namespace != namespace_id {
            return false;
        }
        self.target_namespace = namespace_id;
        true
    }
}

/// Outcome of looking for a document already in the worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// The document has not been seen.
    New,
    /// The document was reached before through another chain.
    Diamond,
    /// The document is an ancestor of the current one.
    Recursive,
}

/// Documents of a compile, in discovery order.
#[derive(Debug, Clone)]
pub struct SchemaWorklist {
    schemas: Vec<ExternalSchemaInfo>,
    current: usize,
}

impl SchemaWorklist {
    /// Creates a worklist holding the top-level document.
    #[must_use]
    pub fn new(top_level: ExternalSchemaInfo) -> Self {
        Self {
            schemas: vec![top_level],
            current: 0,
        }
    }

    /// Returns the document being parsed.
    #[must_use]
    pub fn current(&self) -> &ExternalSchemaInfo {
        &self.schemas[self.current]
    }

    /// Returns the document being parsed, mutably.
    pub fn current_mut(&mut self) -> &mut ExternalSchemaInfo {
        &mut self.schemas[self.current]
    }

    /// Returns the index of the document being parsed.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Returns the top-level document.
    #[must_use]
    pub fn top(&self) -> &ExternalSchemaInfo {
        &self.schemas[0]
    }

    /// Moves to the next queued document.
    ///
    /// # Returns
    /// `false` when every document has been visited.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.schemas.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Classifies a document named from the current one.
    ///
    /// Documents are identified by location and target namespace.
    #[must_use]
    pub fn check_existing(&self, location: &str, target_namespace: NamespaceId) -> Inclusion {
        let Some(found) = self.schemas.iter().position(|schema| {
            schema.location == location && schema.target_namespace == target_namespace
        }) else {
            return Inclusion::New;
        };

        let ancestors = std::iter::successors(Some(self.current), |&index| {
            self.schemas[index].parent
        });
        for index in ancestors.take(self.schemas.len()) {
            if index == found {
                return Inclusion::Recursive;
            }
        }
        Inclusion::Diamond
    }

    /// Queues a document.
    pub fn push(&mut self, schema: ExternalSchemaInfo) -> usize {
        self.schemas.push(schema);
        self.schemas.len() - 1
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Always false; the top-level document is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns all documents in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ExternalSchemaInfo> {
        self.schemas.iter()
    }
}
