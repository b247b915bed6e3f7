//! Tag table of the XML Schema vocabulary.
//!
//! Every tag the compiler recognizes has a [`TagDescriptor`] holding its
//! name, the actions run on its start and end tags, and the set of tags
//! allowed as its children. The table is sorted by name so start tags are
//! found with a binary search, and its shape is checked at compile time.

use static_assertions::{assert_eq_size, const_assert};

/// Tags of the XML Schema vocabulary, in name order.
///
/// [`Tag::Null`] stands for the document itself and for unknown tags inside
/// skipped content. [`Tag::Wildcard`] is a content marker with no table
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Tag {
    Null,
    All,
    Annotation,
    Any,
    AnyAttribute,
    Appinfo,
    Attribute,
    AttributeGroup,
    Choice,
    ComplexContent,
    ComplexType,
    Documentation,
    Element,
    Enumeration,
    Extension,
    Field,
    FractionDigits,
    Group,
    Import,
    Include,
    Key,
    Keyref,
    Length,
    List,
    MaxExclusive,
    MaxInclusive,
    MaxLength,
    MinExclusive,
    MinInclusive,
    MinLength,
    Notation,
    Pattern,
    Redefine,
    Restriction,
    Schema,
    Selector,
    Sequence,
    SimpleContent,
    SimpleType,
    TotalDigits,
    Union,
    Unique,
    WhiteSpace,
    Wildcard,
}

/// Number of tags with a table entry.
pub const NUM_TAGS: usize = Tag::Wildcard as usize;

const_assert!(NUM_TAGS < 64);
assert_eq_size!(Tag, u8);

use Tag as T;

/// Tags with a table entry, indexed by discriminant.
const ALL_TAGS: [Tag; NUM_TAGS] = [
    T::Null,
    T::All,
    T::Annotation,
    T::Any,
    T::AnyAttribute,
    T::Appinfo,
    T::Attribute,
    T::AttributeGroup,
    T::Choice,
    T::ComplexContent,
    T::ComplexType,
    T::Documentation,
    T::Element,
    T::Enumeration,
    T::Extension,
    T::Field,
    T::FractionDigits,
    T::Group,
    T::Import,
    T::Include,
    T::Key,
    T::Keyref,
    T::Length,
    T::List,
    T::MaxExclusive,
    T::MaxInclusive,
    T::MaxLength,
    T::MinExclusive,
    T::MinInclusive,
    T::MinLength,
    T::Notation,
    T::Pattern,
    T::Redefine,
    T::Restriction,
    T::Schema,
    T::Selector,
    T::Sequence,
    T::SimpleContent,
    T::SimpleType,
    T::TotalDigits,
    T::Union,
    T::Unique,
    T::WhiteSpace,
];

impl Tag {
    /// Returns the descriptor of the tag.
    ///
    /// [`Tag::Wildcard`] has no entry and maps to the [`Tag::Null`] entry.
    #[must_use]
    pub fn descriptor(self) -> &'static TagDescriptor {
        DESCRIPTOR_TABLE
            .get(self as usize)
            .unwrap_or(&DESCRIPTOR_TABLE[0])
    }

    /// Returns the local name of the tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

/// Set of tags, one bit per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagSet(u64);

impl TagSet {
    /// Creates a set of `tags`. [`Tag::Null`] is always a member.
    #[must_use]
    pub const fn of(tags: &[Tag]) -> Self {
        let mut bits = 1u64 << Tag::Null as u32;
        let mut i = 0;
        while i < tags.len() {
            bits |= 1u64 << tags[i] as u32;
            i += 1;
        }
        Self(bits)
    }

    /// Returns true if `tag` is a member.
    #[must_use]
    pub const fn contains(self, tag: Tag) -> bool {
        self.0 & (1u64 << tag as u32) != 0
    }
}

/// Action run on a start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    /// Not supported; reports an error and skips the content.
    Bad,
    /// Transparent; the content is processed.
    Noop,
    /// Ignored along with its content.
    Skip,
    Attribute,
    Record,
    Type,
    Element,
    Enumeration,
    /// Handled as a restriction when unsupported features are allowed,
    /// otherwise as [`StartAction::Bad`].
    Extension,
    Group,
    Import,
    Include,
    List,
    Restriction,
    Schema,
}

impl StartAction {
    /// Returns true if the action always reports an error.
    #[must_use]
    pub const fn is_rejected(self, allow_unsupported: bool) -> bool {
        match self {
            Self::Bad => true,
            Self::Extension => !allow_unsupported,
            _ => false,
        }
    }
}

/// Action run on an end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    Schema,
    Element,
    Attribute,
    Type,
    Record,
    Other,
}

/// Table entry of one tag.
#[derive(Debug, Clone, Copy)]
pub struct TagDescriptor {
    /// Local name of the tag.
    pub name: &'static str,
    /// Action run on the start tag.
    pub start: StartAction,
    /// Action run on the end tag.
    pub end: EndAction,
    /// Tags allowed as children.
    pub content: TagSet,
}

impl TagDescriptor {
    const fn new(name: &'static str, start: StartAction, end: EndAction, content: &[Tag]) -> Self {
        Self {
            name,
            start,
            end,
            content: TagSet::of(content),
        }
    }

    /// Returns true if `tag` may appear as a child.
    #[must_use]
    pub const fn allows(&self, tag: Tag) -> bool {
        self.content.contains(tag) || self.content.contains(Tag::Wildcard)
    }
}

use EndAction as E;
use StartAction as S;

const FACET: &[Tag] = &[T::Annotation];

/// Descriptors of all tags, sorted by name.
pub static DESCRIPTOR_TABLE: [TagDescriptor; NUM_TAGS] = TABLE;

const TABLE: [TagDescriptor; NUM_TAGS] = [
    TagDescriptor::new("", S::Bad, E::Other, &[T::Schema]),
    TagDescriptor::new("all", S::Noop, E::Other, &[T::Annotation, T::Element]),
    TagDescriptor::new("annotation", S::Skip, E::Other, &[T::Appinfo, T::Documentation]),
    TagDescriptor::new("any", S::Bad, E::Other, FACET),
    TagDescriptor::new("anyAttribute", S::Bad, E::Other, FACET),
    TagDescriptor::new("appinfo", S::Skip, E::Other, &[T::Wildcard]),
    TagDescriptor::new("attribute", S::Attribute, E::Attribute, &[T::Annotation, T::SimpleType]),
    TagDescriptor::new(
        "attributeGroup",
        S::Skip,
        E::Other,
        &[T::Annotation, T::Attribute, T::AttributeGroup, T::AnyAttribute],
    ),
    TagDescriptor::new(
        "choice",
        S::Record,
        E::Record,
        &[T::Annotation, T::Element, T::Group, T::Choice, T::Sequence, T::Any],
    ),
    TagDescriptor::new(
        "complexContent",
        S::Noop,
        E::Other,
        &[T::Annotation, T::Restriction, T::Extension],
    ),
    TagDescriptor::new(
        "complexType",
        S::Type,
        E::Type,
        &[
            T::Annotation,
            T::SimpleContent,
            T::ComplexContent,
            T::Group,
            T::All,
            T::Choice,
            T::Sequence,
            T::Attribute,
            T::AttributeGroup,
            T::AnyAttribute,
        ],
    ),
    TagDescriptor::new("documentation", S::Skip, E::Other, &[T::Wildcard]),
    TagDescriptor::new(
        "element",
        S::Element,
        E::Element,
        &[
            T::Annotation,
            T::SimpleType,
            T::ComplexType,
            T::Unique,
            T::Key,
            T::Keyref,
        ],
    ),
    TagDescriptor::new("enumeration", S::Enumeration, E::Other, FACET),
    TagDescriptor::new(
        "extension",
        S::Extension,
        E::Other,
        &[
            T::Annotation,
            T::Group,
            T::All,
            T::Choice,
            T::Sequence,
            T::Attribute,
            T::AttributeGroup,
            T::AnyAttribute,
        ],
    ),
    TagDescriptor::new("field", S::Skip, E::Other, FACET),
    TagDescriptor::new("fractionDigits", S::Skip, E::Other, FACET),
    TagDescriptor::new(
        "group",
        S::Group,
        E::Other,
        &[T::Annotation, T::All, T::Choice, T::Sequence],
    ),
    TagDescriptor::new("import", S::Import, E::Other, FACET),
    TagDescriptor::new("include", S::Include, E::Other, FACET),
    TagDescriptor::new("key", S::Skip, E::Other, &[T::Annotation, T::Selector, T::Field]),
    TagDescriptor::new("keyref", S::Skip, E::Other, &[T::Annotation, T::Selector, T::Field]),
    TagDescriptor::new("length", S::Skip, E::Other, FACET),
    TagDescriptor::new("list", S::List, E::Other, &[T::Annotation, T::SimpleType]),
    TagDescriptor::new("maxExclusive", S::Skip, E::Other, FACET),
    TagDescriptor::new("maxInclusive", S::Skip, E::Other, FACET),
    TagDescriptor::new("maxLength", S::Skip, E::Other, FACET),
    TagDescriptor::new("minExclusive", S::Skip, E::Other, FACET),
    TagDescriptor::new("minInclusive", S::Skip, E::Other, FACET),
    TagDescriptor::new("minLength", S::Skip, E::Other, FACET),
    TagDescriptor::new("notation", S::Skip, E::Other, FACET),
    TagDescriptor::new("pattern", S::Skip, E::Other, FACET),
    TagDescriptor::new(
        "redefine",
        S::Bad,
        E::Other,
        &[
            T::Annotation,
            T::SimpleType,
            T::ComplexType,
            T::Group,
            T::AttributeGroup,
        ],
    ),
    TagDescriptor::new(
        "restriction",
        S::Restriction,
        E::Other,
        &[
            T::Annotation,
            T::Group,
            T::All,
            T::Choice,
            T::Sequence,
            T::Attribute,
            T::AttributeGroup,
            T::AnyAttribute,
            T::MinExclusive,
            T::MinInclusive,
            T::MaxExclusive,
            T::MaxInclusive,
            T::TotalDigits,
            T::FractionDigits,
            T::Length,
            T::MinLength,
            T::MaxLength,
            T::Enumeration,
            T::WhiteSpace,
            T::Pattern,
        ],
    ),
    TagDescriptor::new(
        "schema",
        S::Schema,
        E::Schema,
        &[
            T::Include,
            T::Import,
            T::Redefine,
            T::Annotation,
            T::SimpleType,
            T::ComplexType,
            T::Group,
            T::AttributeGroup,
            T::Element,
            T::Attribute,
            T::Notation,
        ],
    ),
    TagDescriptor::new("selector", S::Skip, E::Other, FACET),
    TagDescriptor::new(
        "sequence",
        S::Record,
        E::Record,
        &[T::Annotation, T::Element, T::Group, T::Choice, T::Sequence, T::Any],
    ),
    TagDescriptor::new(
        "simpleContent",
        S::Noop,
        E::Other,
        &[T::Annotation, T::Restriction, T::Extension],
    ),
    TagDescriptor::new(
        "simpleType",
        S::Type,
        E::Type,
        &[T::Annotation, T::Restriction, T::List, T::Union],
    ),
    TagDescriptor::new("totalDigits", S::Skip, E::Other, FACET),
    TagDescriptor::new("union", S::Bad, E::Other, &[T::Annotation, T::SimpleType]),
    TagDescriptor::new("unique", S::Skip, E::Other, &[T::Annotation, T::Selector, T::Field]),
    TagDescriptor::new("whiteSpace", S::Skip, E::Other, FACET),
];

const fn str_less(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut i = 0;
    while i < a.len() && i < b.len() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
        i += 1;
    }
    a.len() < b.len()
}

const fn table_is_sorted() -> bool {
    let mut i = 1;
    while i < NUM_TAGS {
        if !str_less(TABLE[i - 1].name, TABLE[i].name) {
            return false;
        }
        i += 1;
    }
    true
}

const fn tags_match_table() -> bool {
    let mut i = 0;
    while i < NUM_TAGS {
        if ALL_TAGS[i] as usize != i {
            return false;
        }
        i += 1;
    }
    true
}

const_assert!(table_is_sorted());
const_assert!(tags_match_table());

/// Finds a tag by local name. [`Tag::Null`] is never returned.
#[must_use]
pub fn lookup(local_name: &str) -> Option<Tag> {
    DESCRIPTOR_TABLE[1..]
        .binary_search_by(|descriptor| descriptor.name.cmp(local_name))
        .ok()
        .map(|index| ALL_TAGS[index + 1])
}

/// Formats the children `parent` allows for a diagnostic.
///
/// Tags that are always rejected are left out. The result reads
/// `NOTHING`, `<a>`, `<a> or <b>`, or `<a>, <b>, or <c>`.
#[must_use]
pub fn expected_children(parent: Tag, allow_unsupported: bool) -> String {
    let content = parent.descriptor().content;
    let names: Vec<&str> = ALL_TAGS[1..]
        .iter()
        .filter(|tag| content.contains(**tag))
        .map(|tag| tag.descriptor())
        .filter(|descriptor| !descriptor.start.is_rejected(allow_unsupported))
        .map(|descriptor| descriptor.name)
        .collect();

    match names.as_slice() {
        [] => "NOTHING".to_string(),
        [only] => format!("<{only}>"),
        [first, second] => format!("<{first}> or <{second}>"),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(|name| format!("<{name}>")).collect();
            format!("{}, or <{last}>", init.join(", "))
        }
    }
}
