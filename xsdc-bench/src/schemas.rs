//! Synthetic XSD documents.
//!
//! Every generated document declares the target namespace `urn:bench`
//! bound to the prefix `t`.

use std::fmt::Write;
use xsdc_schema::MemoryResolver;

const TARGET_NAMESPACE: &str = "urn:bench";

/// Scalar field types cycled through by the generators.
const FIELD_TYPES: [&str; 8] = [
    "xs:int",
    "xs:string",
    "xs:double",
    "xs:boolean",
    "xs:long",
    "xs:dateTime",
    "xs:decimal",
    "xs:base64Binary",
];

/// Size of a generated schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaShape {
    /// Number of top-level record elements.
    pub records: usize,
    /// Scalar fields per record.
    pub fields: usize,
    /// Number of named enumeration types.
    pub enumerations: usize,
    /// Enumerators per enumeration.
    pub enumerators: usize,
}

impl SchemaShape {
    /// Creates a shape.
    #[must_use]
    pub const fn new(records: usize, fields: usize, enumerations: usize, enumerators: usize) -> Self {
        Self {
            records,
            fields,
            enumerations,
            enumerators,
        }
    }
}

fn open_schema(out: &mut String) {
    let _ = write!(
        out,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="{TARGET_NAMESPACE}" targetNamespace="{TARGET_NAMESPACE}">"#
    );
    out.push('\n');
}

fn close_schema(out: &mut String) {
    out.push_str("</xs:schema>\n");
}

fn write_enumeration(out: &mut String, name: &str, enumerators: usize) {
    let _ = writeln!(
        out,
        r#"  <xs:simpleType name="{name}"><xs:restriction base="xs:string">"#
    );
    for i in 0..enumerators {
        let _ = writeln!(out, r#"    <xs:enumeration value="{name}_V{i}"/>"#);
    }
    out.push_str("  </xs:restriction></xs:simpleType>\n");
}

/// Writes the sequence body of a record: scalar fields, an optional
/// enumeration field and an array field.
fn write_fields(out: &mut String, fields: usize, enumeration: Option<&str>) {
    out.push_str("    <xs:sequence>\n");
    for i in 0..fields {
        let field_type = FIELD_TYPES[i % FIELD_TYPES.len()];
        let _ = writeln!(
            out,
            r#"      <xs:element name="f{i}" type="{field_type}" minOccurs="0"/>"#
        );
    }
    if let Some(enumeration) = enumeration {
        let _ = writeln!(out, r#"      <xs:element name="kind" type="t:{enumeration}"/>"#);
    }
    out.push_str(
        r#"      <xs:element name="items" type="xs:int" minOccurs="0" maxOccurs="unbounded"/>"#,
    );
    out.push_str("\n    </xs:sequence>\n");
}

/// Generates a single-document schema.
///
/// Records refer to the enumerations round-robin; each record is declared
/// as a top-level element with an anonymous complex type.
#[must_use]
pub fn flat_schema(shape: SchemaShape) -> String {
    let mut out = String::new();
    open_schema(&mut out);
    for e in 0..shape.enumerations {
        write_enumeration(&mut out, &format!("Enum{e}"), shape.enumerators);
    }
    for r in 0..shape.records {
        let enumeration = (shape.enumerations > 0).then(|| format!("Enum{}", r % shape.enumerations));
        let _ = writeln!(out, r#"  <xs:element name="Record{r}"><xs:complexType>"#);
        write_fields(&mut out, shape.fields, enumeration.as_deref());
        out.push_str("  </xs:complexType></xs:element>\n");
    }
    close_schema(&mut out);
    out
}

/// Generates a schema split across a chain of included documents.
///
/// The top-level document `main.xsd` includes `part0.xsd`, which includes
/// `part1.xsd`, and so on. Each part declares `types_per_part` named complex
/// types; the top-level document declares one element per type.
///
/// # Returns
/// The top-level document and a resolver holding every part.
#[must_use]
pub fn include_chain(depth: usize, types_per_part: usize, fields: usize) -> (String, MemoryResolver) {
    let mut resolver = MemoryResolver::new();
    for part in 0..depth {
        let mut doc = String::new();
        open_schema(&mut doc);
        if part + 1 < depth {
            let _ = writeln!(doc, r#"  <xs:include schemaLocation="part{}.xsd"/>"#, part + 1);
        }
        for t in 0..types_per_part {
            let _ = writeln!(doc, r#"  <xs:complexType name="Part{part}Type{t}">"#);
            write_fields(&mut doc, fields, None);
            doc.push_str("  </xs:complexType>\n");
        }
        close_schema(&mut doc);
        resolver.insert(format!("part{part}.xsd"), doc);
    }

    let mut main = String::new();
    open_schema(&mut main);
    if depth > 0 {
        main.push_str("  <xs:include schemaLocation=\"part0.xsd\"/>\n");
    }
    for part in 0..depth {
        for t in 0..types_per_part {
            let _ = writeln!(
                main,
                r#"  <xs:element name="Part{part}Element{t}" type="t:Part{part}Type{t}"/>"#
            );
        }
    }
    close_schema(&mut main);
    (main, resolver)
}
