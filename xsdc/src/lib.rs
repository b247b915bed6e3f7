//! # xsdc
//!
//! XML Schema (XSD) compiler for Rust.
//!
//! xsdc reads an XML Schema document, follows its `<include>` and `<import>`
//! links, and produces a typed schema of records and enumerations that
//! mirrors the top-level elements of the document.
//!
//! ## Features
//!
//! - **Content model validation** - Every tag is checked against the legal children of its parent
//! - **Multi-document schemas** - Includes, chameleon includes and imports with cycle detection
//! - **Typed output** - Records, fields, enumerations, defaults and formatting hints
//! - **Single diagnostic** - The most severe error wins, with location and line number
//!
//! ## Quick Start
//!
//! ```ignore
//! use xsdc::prelude::*;
//!
//! let compiled = SchemaParser::new()
//!     .resolver(FsResolver::new("schemas"))
//!     .parse_str(&xsd, "orders.xsd")?;
//!
//! for record in compiled.schema.records() {
//!     println!("{:?}", record.name);
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Element types, records, fields, enumerations and default values
//! - [`schema`] - XSD reader, content handler, generator and compile driver

pub mod prelude;

/// Typed schema model.
pub mod core {
    pub use xsdc_core::*;
}

/// XML Schema parsing and compilation.
pub mod schema {
    pub use xsdc_schema::*;
}
