//! Built-in XML Schema data types.
//!
//! Each built-in type maps to the closest element type able to hold its
//! values. Facet constraints are not carried over. Unsigned types map to the
//! next larger signed type. Types with no equivalent map to
//! [`ElemType::Void`] and are rejected when referenced.

use xsdc_core::{ElemType, FormattingMode};
use FormattingMode as Fm;

/// Facts about a built-in XML type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlTypeDescriptor {
    /// Local name in the XML Schema namespace.
    pub name: &'static str,
    /// Element type of values.
    pub elem_type: ElemType,
    /// Largest value or length.
    pub max_value: u64,
    /// Intrinsic formatting mode.
    pub formatting_mode: FormattingMode,
}

impl XmlTypeDescriptor {
    const fn new(
        name: &'static str,
        elem_type: ElemType,
        max_value: u64,
        formatting_mode: FormattingMode,
    ) -> Self {
        Self {
            name,
            elem_type,
            max_value,
            formatting_mode,
        }
    }

    /// Returns true for the descriptor shared by all complex types.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        std::ptr::eq(self, &COMPLEX_TYPE_DESCRIPTOR)
    }
}

const INT_MAX: u64 = i32::MAX as u64;
const UNBOUNDED: u64 = u64::MAX;

/// The built-in types of XML Schema part 2.
pub static KNOWN_TYPES: [XmlTypeDescriptor; 46] = [
    XmlTypeDescriptor::new("ENTITIES", ElemType::StringArray, UNBOUNDED, Fm::LIST),
    XmlTypeDescriptor::new("ENTITY", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("ID", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("IDREF", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("IDREFS", ElemType::StringArray, UNBOUNDED, Fm::LIST),
    XmlTypeDescriptor::new("NCName", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("NMTOKEN", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("NMTOKENS", ElemType::StringArray, UNBOUNDED, Fm::LIST),
    XmlTypeDescriptor::new("NOTATION", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("QName", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("anySimpleType", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("anyType", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("anyURI", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("base64Binary", ElemType::CharArray, INT_MAX, Fm::BASE64),
    XmlTypeDescriptor::new("boolean", ElemType::Bool, 1, Fm::DEFAULT),
    XmlTypeDescriptor::new("byte", ElemType::Char, 127, Fm::DEC),
    XmlTypeDescriptor::new("date", ElemType::DateTz, INT_MAX, Fm::DEFAULT),
    XmlTypeDescriptor::new("dateTime", ElemType::DatetimeTz, INT_MAX, Fm::DEFAULT),
    XmlTypeDescriptor::new("decimal", ElemType::Double, INT_MAX, Fm::DEC),
    XmlTypeDescriptor::new("double", ElemType::Double, INT_MAX, Fm::DEFAULT),
    XmlTypeDescriptor::new("duration", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("float", ElemType::Float, INT_MAX, Fm::DEFAULT),
    XmlTypeDescriptor::new("gDay", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("gMonth", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("gMonthDay", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("gYear", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("gYearMonth", ElemType::Void, 0, Fm::DEFAULT),
    XmlTypeDescriptor::new("hexBinary", ElemType::CharArray, INT_MAX, Fm::HEX),
    XmlTypeDescriptor::new("int", ElemType::Int, INT_MAX, Fm::DEFAULT),
    XmlTypeDescriptor::new("integer", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("language", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("long", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("Name", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("negativeInteger", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("nonNegativeInteger", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("nonPositiveInteger", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("normalizedString", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("positiveInteger", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("short", ElemType::Short, i16::MAX as u64, Fm::DEFAULT),
    XmlTypeDescriptor::new("string", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("time", ElemType::TimeTz, INT_MAX, Fm::DEFAULT),
    XmlTypeDescriptor::new("token", ElemType::String, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("unsignedByte", ElemType::Short, 255, Fm::DEFAULT),
    XmlTypeDescriptor::new("unsignedInt", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("unsignedLong", ElemType::Int64, UNBOUNDED, Fm::DEFAULT),
    XmlTypeDescriptor::new("unsignedShort", ElemType::Int, u16::MAX as u64, Fm::DEFAULT),
];

/// Descriptor shared by all complex types.
pub static COMPLEX_TYPE_DESCRIPTOR: XmlTypeDescriptor =
    XmlTypeDescriptor::new("complexType", ElemType::List, INT_MAX, Fm::DEFAULT);

/// Looks up a built-in type by local name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static XmlTypeDescriptor> {
    KNOWN_TYPES.iter().find(|descriptor| descriptor.name == name)
}

/// Returns the descriptor of the built-in `string` type.
#[must_use]
pub fn string_descriptor() -> &'static XmlTypeDescriptor {
    &KNOWN_TYPES[39]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = KNOWN_TYPES.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), KNOWN_TYPES.len());
    }

    #[test]
    fn test_lookup() {
        let byte = lookup("byte").expect("byte");
        assert_eq!(byte.elem_type, ElemType::Char);
        assert_eq!(byte.formatting_mode, FormattingMode::DEC);
        assert_eq!(lookup("Name").expect("Name").elem_type, ElemType::String);
        assert_eq!(lookup("unsignedShort").expect("ushort").max_value, 65535);
        assert_eq!(lookup("duration").expect("duration").elem_type, ElemType::Void);
        assert!(lookup("complexType").is_none());
    }

    #[test]
    fn test_string_descriptor() {
        assert_eq!(string_descriptor().name, "string");
        assert!(!string_descriptor().is_complex());
        assert!(COMPLEX_TYPE_DESCRIPTOR.is_complex());
    }

    #[test]
    fn test_unsupported_types_are_void() {
        let void: Vec<_> = KNOWN_TYPES
            .iter()
            .filter(|d| d.elem_type == ElemType::Void)
            .map(|d| d.name)
            .collect();
        assert_eq!(
            void,
            [
                "NOTATION",
                "anySimpleType",
                "anyType",
                "duration",
                "gDay",
                "gMonth",
                "gMonthDay",
                "gYear",
                "gYearMonth"
            ]
        );
    }
}
