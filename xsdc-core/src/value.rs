//! Default values for generated fields.
//!
//! Default values arrive as XML attribute text and are converted to the
//! native representation of the field's element type.

use crate::error::{Error, Result};
use crate::types::ElemType;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::fmt;

/// A default value in its native representation.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Signed byte.
    Char(i8),
    /// 16-bit integer.
    Short(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Int64(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// String.
    String(String),
    /// Date and time.
    Datetime(NaiveDateTime),
    /// Date.
    Date(NaiveDate),
    /// Time.
    Time(NaiveTime),
    /// Boolean.
    Bool(bool),
    /// Date and time with offset.
    DatetimeTz(DateTime<FixedOffset>),
    /// Date with offset.
    DateTz(NaiveDate, FixedOffset),
    /// Time with offset.
    TimeTz(NaiveTime, FixedOffset),
}

impl DefaultValue {
    /// Parses `text` as a default value for a field of type `elem_type`.
    ///
    /// # Arguments
    /// * `elem_type` - Element type of the field
    /// * `text` - Default value text from the schema
    ///
    /// # Errors
    /// Returns `Error::InvalidDefault` if the text is not a valid value of
    /// the type, or if the type cannot carry a default (arrays, aggregates,
    /// `Void`).
    pub fn parse(elem_type: ElemType, text: &str) -> Result<Self> {
        let invalid = || Error::invalid_default(elem_type, text);
        let value = match elem_type {
            ElemType::Char => Self::Char(text.parse().map_err(|_| invalid())?),
            ElemType::Short => Self::Short(text.parse().map_err(|_| invalid())?),
            ElemType::Int => Self::Int(text.parse().map_err(|_| invalid())?),
            ElemType::Int64 => Self::Int64(text.parse().map_err(|_| invalid())?),
            ElemType::Float => Self::Float(parse_float(text).ok_or_else(invalid)? as f32),
            ElemType::Double => Self::Double(parse_float(text).ok_or_else(invalid)?),
            ElemType::String => Self::String(text.to_string()),
            ElemType::Bool => Self::Bool(parse_bool(text).ok_or_else(invalid)?),
            ElemType::Datetime => Self::Datetime(parse_datetime(text).ok_or_else(invalid)?),
            ElemType::Date => Self::Date(parse_date(text).ok_or_else(invalid)?),
            ElemType::Time => Self::Time(parse_time(text).ok_or_else(invalid)?),
            ElemType::DatetimeTz => {
                let (body, offset) = split_offset(text).ok_or_else(invalid)?;
                let naive = parse_datetime(body).ok_or_else(invalid)?;
                let value = offset
                    .from_local_datetime(&naive)
                    .single()
                    .ok_or_else(invalid)?;
                Self::DatetimeTz(value)
            }
            ElemType::DateTz => {
                let (body, offset) = split_offset(text).ok_or_else(invalid)?;
                Self::DateTz(parse_date(body).ok_or_else(invalid)?, offset)
            }
            ElemType::TimeTz => {
                let (body, offset) = split_offset(text).ok_or_else(invalid)?;
                Self::TimeTz(parse_time(body).ok_or_else(invalid)?, offset)
            }
            _ => return Err(invalid()),
        };
        Ok(value)
    }

    /// Returns the element type this value belongs to.
    #[must_use]
    pub const fn elem_type(&self) -> ElemType {
        match self {
            Self::Char(_) => ElemType::Char,
            Self::Short(_) => ElemType::Short,
            Self::Int(_) => ElemType::Int,
            Self::Int64(_) => ElemType::Int64,
            Self::Float(_) => ElemType::Float,
            Self::Double(_) => ElemType::Double,
            Self::String(_) => ElemType::String,
            Self::Datetime(_) => ElemType::Datetime,
            Self::Date(_) => ElemType::Date,
            Self::Time(_) => ElemType::Time,
            Self::Bool(_) => ElemType::Bool,
            Self::DatetimeTz(_) => ElemType::DatetimeTz,
            Self::DateTz(..) => ElemType::DateTz,
            Self::TimeTz(..) => ElemType::TimeTz,
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "\"{v}\""),
            Self::Datetime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
            Self::Bool(v) => write!(f, "{v}"),
            Self::DatetimeTz(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
            Self::DateTz(d, o) => write!(f, "{}{o}", d.format("%Y-%m-%d")),
            Self::TimeTz(t, o) => write!(f, "{}{o}", t.format("%H:%M:%S%.f")),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        // Only the spellings above are valid XML Schema special values.
        _ if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => None,
        _ => text.parse().ok(),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f").ok()
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Splits an optional trailing `Z` or `+hh:mm`/`-hh:mm` offset from `text`.
///
/// A missing offset is UTC.
fn split_offset(text: &str) -> Option<(&str, FixedOffset)> {
    if let Some(body) = text.strip_suffix('Z') {
        return Some((body, FixedOffset::east_opt(0)?));
    }

    let bytes = text.as_bytes();
    if bytes.len() > 6 && bytes[bytes.len() - 3] == b':' {
        let sign_at = bytes.len() - 6;
        let sign = match bytes[sign_at] {
            b'+' => 1,
            b'-' => -1,
            _ => return Some((text, FixedOffset::east_opt(0)?)),
        };
        let hours: i32 = text[sign_at + 1..sign_at + 3].parse().ok()?;
        let minutes: i32 = text[sign_at + 4..].parse().ok()?;
        if hours > 14 || minutes > 59 {
            return None;
        }
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
        return Some((&text[..sign_at], offset));
    }

    Some((text, FixedOffset::east_opt(0)?))
}
