//! Namespace registry and per-document prefix bindings.
//!
//! The [`NamespaceRegistry`] maps namespace URIs to small integer IDs for the
//! whole compile session. A [`PrefixStack`] holds the prefix bindings in scope
//! for one document and resolves prefixes to registry IDs.

use std::collections::HashMap;
use std::fmt;

/// Identifier of a namespace URI within one compile session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespaceId(i32);

/// First ID of the predefined namespaces.
const PREDEF_MIN: i32 = 0x40000;

impl NamespaceId {
    /// No namespace.
    pub const NONE: Self = Self(-1);
    /// `http://www.w3.org/2000/xmlns/`
    pub const XMLNS: Self = Self(PREDEF_MIN);
    /// `http://www.w3.org/XML/1998/namespace`
    pub const XML: Self = Self(PREDEF_MIN + 1);
    /// `http://www.w3.org/2001/XMLSchema`
    pub const XMLSCHEMA: Self = Self(PREDEF_MIN + 2);
    /// `http://www.w3.org/2001/XMLSchema-instance`
    pub const XMLSCHEMA_INSTANCE: Self = Self(PREDEF_MIN + 3);
    /// Namespace of the `id` and `preserveEnumOrder` annotation attributes.
    pub const ANNOTATION: Self = Self(PREDEF_MIN + 4);
    /// Namespace of synthetic symbols minted by the compiler.
    pub const ANONYMOUS: Self = Self(PREDEF_MIN - 1000);

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns true for [`NamespaceId::NONE`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl Default for NamespaceId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URI of the XML Schema namespace.
pub const XMLSCHEMA_URI: &str = "http://www.w3.org/2001/XMLSchema";

/// URI of the annotation namespace.
pub const ANNOTATION_URI: &str = "http://bloomberg.com/schemas/bdem";

const PREDEFINED: [(NamespaceId, &str); 5] = [
    (NamespaceId::XMLNS, "http://www.w3.org/2000/xmlns/"),
    (NamespaceId::XML, "http://www.w3.org/XML/1998/namespace"),
    (NamespaceId::XMLSCHEMA, XMLSCHEMA_URI),
    (
        NamespaceId::XMLSCHEMA_INSTANCE,
        "http://www.w3.org/2001/XMLSchema-instance",
    ),
    (NamespaceId::ANNOTATION, ANNOTATION_URI),
];

/// Session-wide mapping between namespace URIs and IDs.
///
/// Dynamically registered IDs start at zero and never collide with the
/// predefined IDs. IDs are never reused.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    uris: Vec<String>,
    ids: HashMap<String, NamespaceId>,
}

impl NamespaceRegistry {
    /// Creates a registry holding only the predefined namespaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID of `uri`, registering it if it is new.
    ///
    /// The empty URI maps to [`NamespaceId::NONE`].
    pub fn lookup_or_register(&mut self, uri: &str) -> NamespaceId {
        if let Some(id) = self.lookup_id(uri) {
            return id;
        }
        let id = NamespaceId(self.uris.len() as i32);
        self.uris.push(uri.to_string());
        self.ids.insert(uri.to_string(), id);
        id
    }

    /// Returns the ID of `uri` without registering it.
    #[must_use]
    pub fn lookup_id(&self, uri: &str) -> Option<NamespaceId> {
        if uri.is_empty() {
            return Some(NamespaceId::NONE);
        }
        PREDEFINED
            .iter()
            .find(|(_, known)| *known == uri)
            .map(|(id, _)| *id)
            .or_else(|| self.ids.get(uri).copied())
    }

    /// Returns the URI of `id`, or the empty string for unknown IDs.
    #[must_use]
    pub fn lookup(&self, id: NamespaceId) -> &str {
        if let Some((_, uri)) = PREDEFINED.iter().find(|(known, _)| *known == id) {
            return uri;
        }
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.uris.get(index))
            .map_or("", String::as_str)
    }

    /// Returns the number of dynamically registered namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Returns true if no namespace was registered dynamically.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

/// Prefix bindings in scope for one document.
///
/// Bindings are searched from the most recent. The `xml` and `xmlns`
/// prefixes are always bound.
#[derive(Debug, Clone, Default)]
pub struct PrefixStack {
    bindings: Vec<(String, NamespaceId)>,
}

impl PrefixStack {
    /// Creates an empty prefix stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `uri`, registering the URI if needed.
    ///
    /// # Arguments
    /// * `registry` - Session namespace registry
    /// * `prefix` - Prefix to bind; the empty string binds the default namespace
    /// * `uri` - Namespace URI
    ///
    /// # Returns
    /// The namespace ID the prefix is bound to.
    pub fn push_prefix(
        &mut self,
        registry: &mut NamespaceRegistry,
        prefix: &str,
        uri: &str,
    ) -> NamespaceId {
        let id = registry.lookup_or_register(uri);
        self.bindings.push((prefix.to_string(), id));
        id
    }

    /// Binds `prefix` to an already registered namespace.
    pub fn push_id(&mut self, prefix: &str, id: NamespaceId) {
        self.bindings.push((prefix.to_string(), id));
    }

    /// Returns the namespace `prefix` is bound to, or [`NamespaceId::NONE`].
    #[must_use]
    pub fn lookup_namespace_id(&self, prefix: &str) -> NamespaceId {
        if let Some((_, id)) = self.bindings.iter().rev().find(|(p, _)| p == prefix) {
            return *id;
        }
        match prefix {
            "xml" => NamespaceId::XML,
            "xmlns" => NamespaceId::XMLNS,
            _ => NamespaceId::NONE,
        }
    }

    /// Returns the URI `prefix` is bound to.
    ///
    /// # Arguments
    /// * `registry` - Session namespace registry holding the URIs
    /// * `prefix` - Prefix to resolve; the empty string is the default namespace
    ///
    /// # Returns
    /// The URI, or `None` if the prefix is unbound.
    #[must_use]
    pub fn lookup_namespace_uri<'r>(
        &self,
        registry: &'r NamespaceRegistry,
        prefix: &str,
    ) -> Option<&'r str> {
        let id = self.lookup_namespace_id(prefix);
        (!id.is_none()).then(|| registry.lookup(id))
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drops bindings above `len`.
    pub fn truncate(&mut self, len: usize) {
        self.bindings.truncate(len);
    }

    /// Drops all bindings.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
