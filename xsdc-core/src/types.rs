//! Element type and formatting mode definitions.
//!
//! This module provides the element type enumeration used by generated
//! fields, along with the array/base conversions and the formatting mode
//! flags that carry encoding hints from the XML schema.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Element type of a generated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElemType {
    /// Single signed byte.
    Char,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Int64,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// UTF-8 string.
    String,
    /// Date and time without timezone.
    Datetime,
    /// Date without timezone.
    Date,
    /// Time without timezone.
    Time,
    /// Array of bytes.
    CharArray,
    /// Array of 16-bit integers.
    ShortArray,
    /// Array of 32-bit integers.
    IntArray,
    /// Array of 64-bit integers.
    Int64Array,
    /// Array of 32-bit floats.
    FloatArray,
    /// Array of 64-bit floats.
    DoubleArray,
    /// Array of strings.
    StringArray,
    /// Array of date-times.
    DatetimeArray,
    /// Array of dates.
    DateArray,
    /// Array of times.
    TimeArray,
    /// Single sequence record.
    List,
    /// Repeated sequence record.
    Table,
    /// Boolean.
    Bool,
    /// Date and time with timezone offset.
    DatetimeTz,
    /// Date with timezone offset.
    DateTz,
    /// Time with timezone offset.
    TimeTz,
    /// Array of booleans.
    BoolArray,
    /// Array of date-times with timezone offset.
    DatetimeTzArray,
    /// Array of dates with timezone offset.
    DateTzArray,
    /// Array of times with timezone offset.
    TimeTzArray,
    /// Single choice record.
    Choice,
    /// Repeated choice record.
    ChoiceArray,
    /// No representable type.
    Void,
}

impl ElemType {
    /// Returns the array form of a scalar or aggregate type.
    ///
    /// `List` maps to `Table` and `Choice` to `ChoiceArray`. Returns
    /// `Void` for types that have no array form (including array types).
    #[must_use]
    pub const fn to_array(self) -> Self {
        match self {
            Self::Char => Self::CharArray,
            Self::Short => Self::ShortArray,
            Self::Int => Self::IntArray,
            Self::Int64 => Self::Int64Array,
            Self::Float => Self::FloatArray,
            Self::Double => Self::DoubleArray,
            Self::String => Self::StringArray,
            Self::Datetime => Self::DatetimeArray,
            Self::Date => Self::DateArray,
            Self::Time => Self::TimeArray,
            Self::Bool => Self::BoolArray,
            Self::DatetimeTz => Self::DatetimeTzArray,
            Self::DateTz => Self::DateTzArray,
            Self::TimeTz => Self::TimeTzArray,
            Self::List => Self::Table,
            Self::Choice => Self::ChoiceArray,
            _ => Self::Void,
        }
    }

    /// Returns the array form of this type, or the type itself when it has
    /// no array form.
    #[must_use]
    pub const fn widen_to_array(self) -> Self {
        match self.to_array() {
            Self::Void => self,
            array => array,
        }
    }

    /// Returns the element type of an array type, or `Void` for non-arrays.
    #[must_use]
    pub const fn from_array(self) -> Self {
        match self {
            Self::CharArray => Self::Char,
            Self::ShortArray => Self::Short,
            Self::IntArray => Self::Int,
            Self::Int64Array => Self::Int64,
            Self::FloatArray => Self::Float,
            Self::DoubleArray => Self::Double,
            Self::StringArray => Self::String,
            Self::DatetimeArray => Self::Datetime,
            Self::DateArray => Self::Date,
            Self::TimeArray => Self::Time,
            Self::BoolArray => Self::Bool,
            Self::DatetimeTzArray => Self::DatetimeTz,
            Self::DateTzArray => Self::DateTz,
            Self::TimeTzArray => Self::TimeTz,
            Self::Table => Self::List,
            Self::ChoiceArray => Self::Choice,
            _ => Self::Void,
        }
    }

    /// Returns true for arrays of scalar values.
    ///
    /// `Table` and `ChoiceArray` are aggregates, not arrays.
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(
            self,
            Self::CharArray
                | Self::ShortArray
                | Self::IntArray
                | Self::Int64Array
                | Self::FloatArray
                | Self::DoubleArray
                | Self::StringArray
                | Self::DatetimeArray
                | Self::DateArray
                | Self::TimeArray
                | Self::BoolArray
                | Self::DatetimeTzArray
                | Self::DateTzArray
                | Self::TimeTzArray
        )
    }

    /// Returns true for record-valued types.
    #[must_use]
    pub const fn is_aggregate(self) -> bool {
        matches!(
            self,
            Self::List | Self::Table | Self::Choice | Self::ChoiceArray
        )
    }

    /// Returns true for single scalar values.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !self.is_array() && !self.is_aggregate() && !matches!(self, Self::Void)
    }

    /// Returns the canonical upper-case name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Char => "CHAR",
            Self::Short => "SHORT",
            Self::Int => "INT",
            Self::Int64 => "INT64",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Datetime => "DATETIME",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::CharArray => "CHAR_ARRAY",
            Self::ShortArray => "SHORT_ARRAY",
            Self::IntArray => "INT_ARRAY",
            Self::Int64Array => "INT64_ARRAY",
            Self::FloatArray => "FLOAT_ARRAY",
            Self::DoubleArray => "DOUBLE_ARRAY",
            Self::StringArray => "STRING_ARRAY",
            Self::DatetimeArray => "DATETIME_ARRAY",
            Self::DateArray => "DATE_ARRAY",
            Self::TimeArray => "TIME_ARRAY",
            Self::List => "LIST",
            Self::Table => "TABLE",
            Self::Bool => "BOOL",
            Self::DatetimeTz => "DATETIMETZ",
            Self::DateTz => "DATETZ",
            Self::TimeTz => "TIMETZ",
            Self::BoolArray => "BOOL_ARRAY",
            Self::DatetimeTzArray => "DATETIMETZ_ARRAY",
            Self::DateTzArray => "DATETZ_ARRAY",
            Self::TimeTzArray => "TIMETZ_ARRAY",
            Self::Choice => "CHOICE",
            Self::ChoiceArray => "CHOICE_ARRAY",
            Self::Void => "VOID",
        }
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Formatting mode flags attached to a field.
///
/// The low byte holds a single encoding hint (`DEC`, `HEX`, `BASE64`,
/// `TEXT`); the remaining bits are independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormattingMode(u32);

impl FormattingMode {
    /// No encoding hint and no flags.
    pub const DEFAULT: Self = Self(0x0);
    /// Decimal encoding hint.
    pub const DEC: Self = Self(0x1);
    /// Hexadecimal encoding hint.
    pub const HEX: Self = Self(0x2);
    /// Base64 encoding hint.
    pub const BASE64: Self = Self(0x3);
    /// Text encoding hint.
    pub const TEXT: Self = Self(0x4);
    /// Mask selecting the encoding hint.
    pub const TYPE_MASK: Self = Self(0xff);
    /// Field has no tag of its own.
    pub const UNTAGGED: Self = Self(0x100);
    /// Field is encoded as an XML attribute.
    pub const ATTRIBUTE: Self = Self(0x200);
    /// Field is the simple content of its record.
    pub const SIMPLE_CONTENT: Self = Self(0x400);
    /// Field is nillable.
    pub const NILLABLE: Self = Self(0x800);
    /// Field is encoded as a whitespace-separated list.
    pub const LIST: Self = Self(0x1000);

    /// Creates a formatting mode from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns the encoding hint part of the mode.
    #[must_use]
    pub const fn encoding(self) -> Self {
        Self(self.0 & Self::TYPE_MASK.0)
    }

    /// Returns true if every flag in `other` is set.
    ///
    /// Encoding hints are compared by value rather than bitwise.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        let flags = other.0 & !Self::TYPE_MASK.0;
        let hint = other.0 & Self::TYPE_MASK.0;
        (self.0 & flags) == flags && (hint == 0 || (self.0 & Self::TYPE_MASK.0) == hint)
    }

    /// Sets the flags in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the flags in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for FormattingMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FormattingMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FormattingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hint = match self.encoding().0 {
            0x0 => "DEFAULT",
            0x1 => "DEC",
            0x2 => "HEX",
            0x3 => "BASE64",
            0x4 => "TEXT",
            _ => "UNKNOWN",
        };
        f.write_str(hint)?;
        for (flag, name) in [
            (Self::UNTAGGED, "UNTAGGED"),
            (Self::ATTRIBUTE, "ATTRIBUTE"),
            (Self::SIMPLE_CONTENT, "SIMPLE_CONTENT"),
            (Self::NILLABLE, "NILLABLE"),
            (Self::LIST, "LIST"),
        ] {
            if self.contains(flag) {
                write!(f, "|{name}")?;
            }
        }
        Ok(())
    }
}
