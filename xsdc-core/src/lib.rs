//! # xsdc Core
//!
//! Typed schema model produced by the xsdc XML Schema compiler.
//!
//! This crate provides:
//! - Element types and formatting hints for generated fields
//! - Record, field and enumeration definitions collected in a [`Schema`]
//! - Default value parsing for scalar element types
//! - Error types for schema construction

pub mod error;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use schema::{
    Constraint, EnumerationDef, EnumerationId, Enumerator, FieldDef, RecordDef, RecordId,
    RecordKind, Schema,
};
pub use types::{ElemType, FormattingMode};
pub use value::DefaultValue;
