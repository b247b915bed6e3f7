//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use xsdc::prelude::*;
//! ```

// Schema model
pub use xsdc_core::error::{Error as CoreError, Result as CoreResult};
pub use xsdc_core::{
    Constraint, DefaultValue, ElemType, EnumerationDef, Enumerator, FieldDef, FormattingMode,
    RecordDef, RecordKind, Schema,
};

// Compiler
pub use xsdc_schema::{
    CompileError, CompileOptions, CompiledSchema, ErrorInfo, SchemaParser, Severity,
    compile_schema,
};

// Document resolution
pub use xsdc_schema::{FsResolver, MemoryResolver, SchemaResolver};
