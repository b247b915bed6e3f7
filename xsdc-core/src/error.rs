//! Error types for typed schema construction.

use crate::types::ElemType;
use thiserror::Error;

/// Error type for building a typed schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A record or enumeration with this name already exists.
    #[error("duplicate definition name '{name}'")]
    DuplicateName {
        /// Conflicting name.
        name: String,
    },

    /// A field with this name already exists in the record.
    #[error("duplicate field name '{field}' in record '{record}'")]
    DuplicateFieldName {
        /// Record name, or an index placeholder for unnamed records.
        record: String,
        /// Field name.
        field: String,
    },

    /// A field with this ID already exists in the record.
    #[error("duplicate field id {id} in record '{record}'")]
    DuplicateFieldId {
        /// Record name, or an index placeholder for unnamed records.
        record: String,
        /// Field ID.
        id: i32,
    },

    /// An enumerator with this name or ID already exists.
    #[error("duplicate enumerator '{name}' ({id}) in enumeration '{enumeration}'")]
    DuplicateEnumerator {
        /// Enumeration name, or an index placeholder for unnamed enumerations.
        enumeration: String,
        /// Enumerator name.
        name: String,
        /// Enumerator ID.
        id: i32,
    },

    /// Default value text could not be parsed for the element type.
    #[error("invalid default value '{text}' for type {elem_type}")]
    InvalidDefault {
        /// Target element type.
        elem_type: ElemType,
        /// Offending text.
        text: String,
    },
}

impl Error {
    /// Creates an invalid default value error.
    pub fn invalid_default(elem_type: ElemType, text: impl Into<String>) -> Self {
        Self::InvalidDefault {
            elem_type,
            text: text.into(),
        }
    }
}

/// Result type alias for typed schema operations.
pub type Result<T> = std::result::Result<T, Error>;
