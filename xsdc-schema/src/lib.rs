//! # xsdc Schema
//!
//! XML Schema (XSD) compiler producing typed record and enumeration
//! definitions.
//!
//! This crate provides:
//! - A pull-based token reader over quick-xml with namespace prefix scoping
//! - Per-tag validation against the XML Schema content model
//! - Resolution of types, elements and attributes across documents linked
//!   by `<include>` and `<import>`
//! - Generation of an [`xsdc_core::Schema`] from the top-level elements
//! - A single severity-ranked diagnostic per compile

pub mod builtins;
pub mod dispatch;
pub mod error;
pub mod external;
pub mod generator;
pub mod handler;
pub mod model;
pub mod namespace;
pub mod parser;
pub mod reader;

pub use error::{CompileError, ErrorInfo, ReaderError, SchemaError, Severity};
pub use namespace::{NamespaceId, NamespaceRegistry, PrefixStack};
pub use parser::{CompileOptions, CompiledSchema, SchemaParser, compile_schema};
pub use reader::{FsResolver, MemoryResolver, SchemaResolver, TokenReader, XmlReader};
