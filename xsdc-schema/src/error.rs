//! Error types and diagnostics for schema compilation.
//!
//! A compile session keeps a single [`ErrorInfo`] slot. Every problem found
//! while reading documents or generating the output schema is described by a
//! [`SchemaError`] and recorded into that slot with its [`Severity`]. A
//! recorded diagnostic is only replaced by one of equal or greater severity.

use std::fmt;
use thiserror::Error;

/// Diagnostic severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Nothing has been reported.
    #[default]
    NoError,
    /// The compile continues and still succeeds.
    Warning,
    /// The compile fails.
    Error,
    /// The input could not be read as XML.
    Fatal,
}

impl Severity {
    /// Returns the upper-case name of the severity.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoError => "NO_ERROR",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The accumulated diagnostic of a compile session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorInfo {
    severity: Severity,
    line: usize,
    column: usize,
    source: String,
    message: String,
}

impl ErrorInfo {
    /// Creates an empty diagnostic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic unless a more severe one is already present.
    ///
    /// # Arguments
    /// * `severity` - Severity of the new diagnostic
    /// * `line` - Line number in the source document
    /// * `column` - Column number in the source document
    /// * `source` - Location of the source document
    /// * `message` - Diagnostic text
    ///
    /// # Returns
    /// `true` if the diagnostic replaced the current one.
    pub fn set(
        &mut self,
        severity: Severity,
        line: usize,
        column: usize,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> bool {
        if severity < self.severity {
            return false;
        }
        self.severity = severity;
        self.line = line;
        self.column = column;
        self.source = source.into();
        self.message = message.into();
        true
    }

    /// Records a compile diagnostic and logs it.
    ///
    /// # Returns
    /// `true` if the diagnostic replaced the current one.
    pub fn record(&mut self, error: &SchemaError, source: &str, line: usize, column: usize) -> bool {
        let severity = error.severity();
        if severity == Severity::Warning {
            tracing::warn!(source, line, column, "{error}");
        } else {
            tracing::debug!(source, line, column, %severity, "{error}");
        }
        self.set(severity, line, column, source, error.to_string())
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Returns the location of the document the diagnostic refers to.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the diagnostic text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the diagnostic makes the compile fail.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity > Severity::Warning
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.source, self.line, self.column, self.severity, self.message
        )
    }
}

/// Error type for the token reader.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// XML well-formedness error.
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid character or entity reference.
    #[error("{0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// IO error while reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document text is not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The reader was advanced without an open document.
    #[error("no document is open")]
    NotOpen,
}

/// A diagnostic produced while compiling a schema.
///
/// The `Display` text of each variant is the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// XML error reported by the token reader.
    #[error("Schema parser error: {message}")]
    Xml {
        /// Reader error text.
        message: String,
    },

    /// The document could not be opened.
    #[error("Unable to open schema document '{location}' for parsing")]
    OpenFailed {
        /// Document location.
        location: String,
    },

    /// No document was supplied for an include or import.
    #[error("Unable to resolve external schema for the schemaLocation = {location}")]
    UnresolvedSchema {
        /// Requested location.
        location: String,
    },

    /// A start tag outside the XML Schema namespace.
    #[error("Unknown schema element namespace: {uri}:{local_name}")]
    UnknownNamespace {
        /// Namespace URI of the tag.
        uri: String,
        /// Local name of the tag.
        local_name: String,
    },

    /// A tag in the XML Schema namespace that is not recognized.
    #[error("Unknown schema element tag: {tag}")]
    UnknownTag {
        /// Local name of the tag.
        tag: String,
    },

    /// The document does not start with `<schema>`.
    #[error("<{tag}> is not valid at the top level.  Expected <schema>.")]
    InvalidRoot {
        /// Local name of the tag.
        tag: String,
    },

    /// A tag nested in a parent that does not allow it.
    #[error("<{tag}> is not valid within <{parent}>.  Expected {expected}.")]
    InvalidContent {
        /// Local name of the tag.
        tag: String,
        /// Name of the parent tag.
        parent: String,
        /// Formatted list of the tags the parent allows.
        expected: String,
    },

    /// A construct that is recognized but not supported.
    #[error("Unsupported schema element: {tag}")]
    Unsupported {
        /// Name of the tag.
        tag: String,
    },

    /// `<group>` is recognized but not supported.
    #[error("Groups are not yet supported")]
    GroupsUnsupported,

    /// The target namespace of an included or imported document differs
    /// from the expected one.
    #[error("Bad target namespace: got '{got}', expected '{expected}' schemaLocation='{location}'")]
    BadTargetNamespace {
        /// Declared target namespace.
        got: String,
        /// Expected target namespace.
        expected: String,
        /// Document location.
        location: String,
    },

    /// A top-level element is defined twice.
    #[error("Duplicate definition of element, \"{name}\".")]
    DuplicateElement {
        /// Element name.
        name: String,
    },

    /// A top-level attribute is defined twice.
    #[error("Duplicate definition of attribute, \"{name}\".")]
    DuplicateAttribute {
        /// Attribute name.
        name: String,
    },

    /// A top-level type is defined twice.
    #[error("Duplicate definition of type, \"{name}\".")]
    DuplicateType {
        /// Type name.
        name: String,
    },

    /// `ref` on a top-level element.
    #[error("Top level elements may not have \"ref\" attributes")]
    TopLevelElementRef,

    /// `ref` on a top-level attribute.
    #[error("Top level attributes may not have \"ref\" attributes")]
    TopLevelAttributeRef,

    /// Reference to an unknown element outside the target namespace.
    #[error("No such element: \"{name}\".  Missing or incorrect namespace prefix?")]
    NoSuchElement {
        /// Referenced name.
        name: String,
    },

    /// Reference to an unknown attribute outside the target namespace.
    #[error("No such attribute: \"{name}\".  Missing or incorrect namespace prefix?")]
    NoSuchAttribute {
        /// Referenced name.
        name: String,
    },

    /// Reference to an unknown type outside the target namespace.
    #[error("No such type: \"{name}\".  Missing or incorrect namespace prefix?")]
    NoSuchType {
        /// Referenced name.
        name: String,
    },

    /// Reference to a built-in type with no typed equivalent.
    #[error("Unsupported built-in XML type: {name}")]
    UnsupportedBuiltin {
        /// Built-in type name.
        name: String,
    },

    /// `<element>` without a name or reference.
    #[error("Element is missing name")]
    ElementMissingName,

    /// `<attribute>` without a name or reference.
    #[error("Attribute is missing a name")]
    AttributeMissingName,

    /// Both `default` and `fixed` are present.
    #[error("Mutually-exclusive attributes 'default' and 'fixed' are both specified")]
    DefaultAndFixed,

    /// Invalid value of the `use` attribute.
    #[error("'use' attribute must have value 'optional', 'prohibited', or 'required'.")]
    InvalidUse,

    /// A numeric attribute that does not hold an integer.
    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidNumber {
        /// Attribute name.
        attribute: String,
        /// Attribute text.
        value: String,
    },

    /// Attribute declared in a choice or simple-content type.
    #[error("Attributes are supported only on <sequence> and <all> types.")]
    AttributeNotSupported,

    /// `<enumeration>` outside a type definition.
    #[error("Attempted to add enumeration to a non-type")]
    EnumerationOutsideType,

    /// Top-level type without a name.
    #[error("Top-level type is missing name.")]
    TopLevelTypeMissingName,

    /// Named type nested in an element or attribute.
    #[error("Only top-level types may have names.")]
    NamedLocalType,

    /// `<choice>` or `<sequence>` with a name.
    #[error("<choice> or <sequence> can not have a name")]
    NamedRecord,

    /// `<choice>` after fields were added to the type.
    #[error("Cannot define a <choice> with previously-defined elements or attributes.")]
    ChoiceAfterFields,

    /// `<choice>` or `<sequence>` in an invalid parent.
    #[error("<{tag}> is valid only in <complexType>, <sequence>, or <choice>.")]
    RecordContext {
        /// Name of the tag.
        tag: String,
    },

    /// `<restriction>` or `<extension>` outside a type definition.
    #[error("Attempted to restrict a non-type")]
    RestrictionOutsideType,

    /// `<list>` outside a type definition.
    #[error("Attempted to define a list outside of a type")]
    ListOutsideType,

    /// `<restriction>` or `<extension>` without `base`.
    #[error("No base type specified in extension/restriction")]
    MissingBase,

    /// `<list>` without `itemType`.
    #[error("No itemType specified for list")]
    MissingItemType,

    /// A type whose base chain leads back to itself.
    #[error("Recursive extension or restriction of type \"{name}\".")]
    RecursiveDerivation {
        /// Type name.
        name: String,
    },

    /// `<include>` or `<import>` not directly under `<schema>`.
    #[error("Construct <{tag}> must be directly under the root")]
    NotUnderRoot {
        /// Name of the tag.
        tag: String,
    },

    /// `<include>` with an empty `schemaLocation`.
    #[error("attribute 'schemaLocation' is empty")]
    EmptySchemaLocation,

    /// `<import>` without `namespace`.
    #[error("attribute 'namespace' must be specified for <import>")]
    MissingImportNamespace,

    /// `<import>` of the current target namespace.
    #[error("attribute 'namespace' may not match outer schema's target namespace")]
    ImportOwnNamespace,

    /// A document that includes itself through its own ancestors.
    #[error("Recursive inclusion of schema '{location}'")]
    RecursiveInclusion {
        /// Document location.
        location: String,
    },

    /// An element or attribute that ended without a type.
    #[error("Element definition has no type")]
    UndefinedElement,

    /// Field without a type.
    #[error("No type specified for element \"{record}.{element}\".")]
    NoTypeSpecified {
        /// Owning record name.
        record: String,
        /// Element name.
        element: String,
    },

    /// Field referring to an element without a type.
    #[error("No type definition found for (indirect) element \"{record}.{element}\".")]
    NoIndirectType {
        /// Owning record name.
        record: String,
        /// Element name.
        element: String,
    },

    /// Field of a type that was referenced but never defined.
    #[error("Undefined type \"{type_name}\" referenced from element \"{record}.{element}\".")]
    UndefinedType {
        /// Type name.
        type_name: String,
        /// Owning record name.
        record: String,
        /// Element name.
        element: String,
    },

    /// Negative `minOccurs`.
    #[error("Invalid value of 'minOccurs' attribute for element \"{record}.{element}\".")]
    InvalidMinOccurs {
        /// Owning record name.
        record: String,
        /// Element name.
        element: String,
    },

    /// `maxOccurs` smaller than `minOccurs`.
    #[error(
        "'maxOccurs' value must be greater or equal to 'minOccurs' value for element \"{record}.{element}\"."
    )]
    MaxBelowMin {
        /// Owning record name.
        record: String,
        /// Element name.
        element: String,
    },

    /// Repeated element of an array type.
    #[error("'maxOccurs' is not supported for array types on element \"{record}.{element}\".")]
    RepeatedArray {
        /// Owning record name.
        record: String,
        /// Element name.
        element: String,
    },

    /// A type that was referenced but never defined.
    #[error("No definition for type \"{name}\".")]
    NoDefinition {
        /// Type name.
        name: String,
    },

    /// Output record or enumeration name already taken.
    #[error(
        "A type and a root element both have the name, \"{name},\" but element \"{name}\" is not of type \"{name}.\""
    )]
    NameCollision {
        /// Conflicting name.
        name: String,
    },

    /// Field whose type has no typed equivalent.
    #[error("{record}.{field} has no type.")]
    NoType {
        /// Owning record name.
        record: String,
        /// Field name.
        field: String,
    },

    /// Default value that cannot be parsed for the field type.
    #[error("Invalid default value {value} specified for {record}.{field}")]
    InvalidDefault {
        /// Default value text.
        value: String,
        /// Owning record name.
        record: String,
        /// Field name.
        field: String,
    },

    /// Field name or ID used twice in one record.
    #[error("{record}.{field} is defined twice.")]
    DuplicateField {
        /// Owning record name.
        record: String,
        /// Field name.
        field: String,
    },

    /// Enumerator literal or ID used twice in one enumeration.
    #[error("Duplicate enumerator \"{name}\" in enumeration \"{enumeration}\" ignored")]
    DuplicateEnumerator {
        /// Enumeration name.
        enumeration: String,
        /// Enumerator literal.
        name: String,
    },

    /// Error from the typed schema.
    #[error(transparent)]
    Output(#[from] xsdc_core::Error),
}

impl SchemaError {
    /// Returns the severity this diagnostic is recorded with.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Xml { .. } => Severity::Fatal,
            Self::DuplicateEnumerator { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Creates an unsupported construct error.
    pub fn unsupported(tag: impl Into<String>) -> Self {
        Self::Unsupported { tag: tag.into() }
    }

    /// Creates an invalid number error.
    pub fn invalid_number(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Error returned when a compile fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The accumulated diagnostic exceeded warning severity.
    #[error("{0}")]
    Failed(ErrorInfo),
}

impl CompileError {
    /// Returns the diagnostic that made the compile fail.
    #[must_use]
    pub const fn info(&self) -> &ErrorInfo {
        match self {
            Self::Failed(info) => info,
        }
    }
}
