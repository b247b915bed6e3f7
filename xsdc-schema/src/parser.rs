//! Schema compile driver.
//!
//! [`SchemaParser`] reads the top-level document, then every document it
//! includes or imports, and finally generates the typed schema. The compile
//! fails as soon as a diagnostic above warning severity is recorded.

use crate::error::{CompileError, ErrorInfo, SchemaError, Severity};
use crate::handler::ContentHandler;
use crate::reader::{SchemaResolver, XmlReader};
use std::collections::BTreeMap;
use std::io::Read;
use xsdc_core::Schema;

/// Options of a compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Accept `<extension>` as a restriction and attributes on choice and
    /// simple-content types.
    pub allow_unsupported: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            allow_unsupported: cfg!(feature = "allow-unsupported"),
        }
    }
}

/// Result of a successful compile.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    /// Generated records and enumerations.
    pub schema: Schema,
    /// Target namespace URI of the top-level document.
    pub target_namespace: String,
    /// Attributes of the top-level `<schema>` tag by qualified name.
    pub attributes: BTreeMap<String, String>,
    /// Warning recorded during the compile, if any.
    pub diagnostic: ErrorInfo,
}

/// XML Schema compiler.
///
/// # Example
/// ```
/// use xsdc_schema::SchemaParser;
///
/// let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
///     <xs:element name="Point">
///         <xs:complexType>
///             <xs:sequence>
///                 <xs:element name="x" type="xs:double"/>
///                 <xs:element name="y" type="xs:double"/>
///             </xs:sequence>
///         </xs:complexType>
///     </xs:element>
/// </xs:schema>"#;
///
/// let compiled = SchemaParser::new().parse_str(xsd, "point.xsd").unwrap();
/// assert_eq!(compiled.schema.records().len(), 1);
/// ```
#[derive(Default)]
pub struct SchemaParser {
    options: CompileOptions,
    resolver: Option<Box<dyn SchemaResolver>>,
}

impl SchemaParser {
    /// Creates a parser with default options and no resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resolver for included and imported documents.
    #[must_use]
    pub fn resolver(mut self, resolver: impl SchemaResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Enables or disables unsupported constructs.
    #[must_use]
    pub fn allow_unsupported(mut self, allow: bool) -> Self {
        self.options.allow_unsupported = allow;
        self
    }

    /// Replaces all options.
    #[must_use]
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Compiles the schema read from `input`.
    ///
    /// # Arguments
    /// * `input` - Top-level document
    /// * `location` - Location of the document, used in diagnostics
    ///
    /// # Errors
    /// Returns `CompileError::Failed` with the diagnostic if any document is
    /// malformed or invalid, or if the schema cannot be generated.
    pub fn parse(
        &mut self,
        input: &mut dyn Read,
        location: &str,
    ) -> Result<CompiledSchema, CompileError> {
        let mut handler = ContentHandler::new(location, self.options);
        let mut reader = XmlReader::new();
        handler.parse_document(&mut reader, input);

        while handler.error().severity() <= Severity::Warning && handler.advance_document() {
            let current = handler.worklist().current();
            let location = current.location().to_string();
            let namespace = handler
                .registry()
                .lookup(current.target_namespace())
                .to_string();
            tracing::debug!(location = %location, namespace = %namespace, "resolving external schema");

            let document = self
                .resolver
                .as_mut()
                .and_then(|resolver| resolver.resolve(&location, &namespace));
            match document {
                Some(mut document) => handler.parse_document(&mut reader, &mut *document),
                None => handler.set_error(SchemaError::UnresolvedSchema { location }),
            }
        }

        let mut schema = Schema::new();
        if handler.error().severity() <= Severity::Warning {
            handler.generate(&mut schema);
        }
        if handler.error().is_failure() {
            return Err(CompileError::Failed(handler.error().clone()));
        }

        tracing::debug!(
            records = schema.records().len(),
            enumerations = schema.enumerations().len(),
            "schema compiled"
        );
        Ok(CompiledSchema {
            schema,
            target_namespace: handler.target_namespace_uri().to_string(),
            attributes: handler.schema_attributes().clone(),
            diagnostic: handler.error().clone(),
        })
    }

    /// Compiles the schema in `text`.
    ///
    /// # Errors
    /// See [`SchemaParser::parse`].
    pub fn parse_str(&mut self, text: &str, location: &str) -> Result<CompiledSchema, CompileError> {
        self.parse(&mut text.as_bytes(), location)
    }
}

/// Compiles a standalone schema document with default options.
///
/// # Errors
/// Returns `CompileError::Failed` if the schema is invalid or refers to
/// other documents.
pub fn compile_schema(xsd: &str) -> Result<CompiledSchema, CompileError> {
    SchemaParser::new().parse_str(xsd, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemoryResolver;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;
    use xsdc_core::{Constraint, DefaultValue, ElemType, FormattingMode, RecordDef, RecordKind};

    fn schema(body: &str) -> String {
        format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:bdem="http://bloomberg.com/schemas/bdem"
                          xmlns:t="urn:t" targetNamespace="urn:t">{body}</xs:schema>"#
        )
    }

    fn compile(body: &str) -> CompiledSchema {
        SchemaParser::new()
            .parse_str(&schema(body), "test.xsd")
            .expect("compile")
    }

    fn compile_err(body: &str) -> ErrorInfo {
        SchemaParser::new()
            .parse_str(&schema(body), "test.xsd")
            .expect_err("compile should fail")
            .info()
            .clone()
    }

    fn record<'a>(compiled: &'a CompiledSchema, name: &str) -> &'a RecordDef {
        compiled.schema.find_record(name).expect("record")
    }

    fn field_names(record: &RecordDef) -> Vec<&str> {
        record
            .fields
            .iter()
            .map(|field| field.name.as_deref().unwrap_or(""))
            .collect()
    }

    fn holder(fields: &str) -> String {
        format!(
            r#"<xs:element name="Holder"><xs:complexType><xs:sequence>{fields}</xs:sequence></xs:complexType></xs:element>"#
        )
    }

    #[test]
    fn test_point_record() {
        let compiled = compile(
            r#"<xs:element name="Point"><xs:complexType><xs:sequence>
                 <xs:element name="x" type="xs:double"/>
                 <xs:element name="y" type="xs:double"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        );
        assert_eq!(compiled.schema.records().len(), 1);
        let point = record(&compiled, "Point");
        assert_eq!(point.kind, RecordKind::Sequence);
        assert_eq!(field_names(point), ["x", "y"]);
        for field in &point.fields {
            assert_eq!(field.elem_type, ElemType::Double);
            assert!(!field.nullable);
            assert!(field.constraint.is_none());
        }
        assert_eq!(compiled.target_namespace, "urn:t");
        assert_eq!(compiled.diagnostic.severity(), Severity::NoError);
    }

    #[test]
    fn test_optional_field_is_nullable() {
        let compiled = compile(&holder(
            r#"<xs:element name="Tag" type="xs:string" minOccurs="0"/>"#,
        ));
        let tag = record(&compiled, "Holder").field("Tag").expect("field");
        assert_eq!(tag.elem_type, ElemType::String);
        assert!(tag.nullable);
    }

    #[test]
    fn test_repeated_field_is_array() {
        let compiled = compile(&holder(
            r#"<xs:element name="Tags" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>"#,
        ));
        let tags = record(&compiled, "Holder").field("Tags").expect("field");
        assert_eq!(tags.elem_type, ElemType::StringArray);
        assert!(!tags.nullable);
    }

    #[test]
    fn test_shared_type_gets_one_record_per_root() {
        let compiled = compile(
            r#"<xs:complexType name="Shared"><xs:sequence>
                 <xs:element name="v" type="xs:int"/>
               </xs:sequence></xs:complexType>
               <xs:element name="Foo" type="t:Shared"/>
               <xs:element name="Bar" type="t:Shared"/>"#,
        );
        assert_eq!(compiled.schema.records().len(), 2);
        assert!(compiled.schema.find_record("Shared").is_none());
        let foo = record(&compiled, "Foo");
        let bar = record(&compiled, "Bar");
        assert_eq!(field_names(foo), ["v"]);
        assert_eq!(field_names(bar), ["v"]);
        assert_ne!(foo.fields.as_ptr(), bar.fields.as_ptr());

        let mut schema = compiled.schema;
        let foo_id = schema.find_record_id("Foo").expect("Foo");
        let bar_id = schema.find_record_id("Bar").expect("Bar");
        assert_ne!(foo_id, bar_id);

        schema.record_mut(foo_id).fields.clear();
        assert!(schema.record(foo_id).is_empty());
        assert_eq!(field_names(schema.record(bar_id)), ["v"]);
    }

    #[test]
    fn test_undefined_ref_hints_at_prefix() {
        let error = compile_err(&holder(r#"<xs:element ref="undefined:Missing"/>"#));
        assert_eq!(error.severity(), Severity::Error);
        assert!(
            error
                .message()
                .contains("Missing or incorrect namespace prefix?")
        );
        assert_eq!(error.source(), "test.xsd");
    }

    #[test]
    fn test_default_value_is_never_null() {
        let compiled = compile(&holder(
            r#"<xs:element name="count" type="xs:int" minOccurs="1" default="5"/>
               <xs:element name="flag" type="xs:boolean" fixed="true"/>"#,
        ));
        let holder = record(&compiled, "Holder");
        let count = holder.field("count").expect("count");
        assert_eq!(count.default_value, Some(DefaultValue::Int(5)));
        assert!(!count.nullable);
        let flag = holder.field("flag").expect("flag");
        assert_eq!(flag.default_value, Some(DefaultValue::Bool(true)));
        assert!(!flag.nullable);
    }

    #[test]
    fn test_invalid_default() {
        let error = compile_err(&holder(
            r#"<xs:element name="count" type="xs:int" default="many"/>"#,
        ));
        assert_eq!(
            error.message(),
            "Invalid default value many specified for Holder.count"
        );
    }

    #[test]
    fn test_enumerations() {
        let compiled = compile(
            r#"<xs:simpleType name="Color"><xs:restriction base="xs:string">
                 <xs:enumeration value="RED"/>
                 <xs:enumeration value="GREEN"/>
                 <xs:enumeration value="BLUE"/>
               </xs:restriction></xs:simpleType>
               <xs:simpleType name="Level"><xs:restriction base="xs:string">
                 <xs:enumeration value="LOW" bdem:id="10"/>
                 <xs:enumeration value="HIGH"/>
               </xs:restriction></xs:simpleType>
               <xs:element name="Palette"><xs:complexType><xs:sequence>
                 <xs:element name="color" type="t:Color"/>
                 <xs:element name="level" type="t:Level"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        );
        let color = compiled.schema.find_enumeration("Color").expect("Color");
        assert_eq!(color.id_of("BLUE"), Some(0));
        assert_eq!(color.id_of("GREEN"), Some(1));
        assert_eq!(color.id_of("RED"), Some(2));

        let level = compiled.schema.find_enumeration("Level").expect("Level");
        assert_eq!(level.enumerators[0].name, "LOW");
        assert_eq!(level.id_of("LOW"), Some(10));
        assert_eq!(level.id_of("HIGH"), Some(11));

        let palette = record(&compiled, "Palette");
        let field = palette.field("color").expect("color");
        assert_eq!(field.elem_type, ElemType::String);
        assert!(matches!(field.constraint, Some(Constraint::Enumeration(_))));
    }

    #[test]
    fn test_enumeration_of_derived_string_type() {
        let compiled = compile(
            r#"<xs:simpleType name="Code"><xs:restriction base="xs:string">
                 <xs:maxLength value="4"/>
               </xs:restriction></xs:simpleType>
               <xs:simpleType name="Side"><xs:restriction base="t:Code">
                 <xs:enumeration value="SELL"/>
                 <xs:enumeration value="BUY"/>
               </xs:restriction></xs:simpleType>
               <xs:simpleType name="Small"><xs:restriction base="xs:int">
                 <xs:enumeration value="1"/>
               </xs:restriction></xs:simpleType>
               <xs:element name="Order"><xs:complexType><xs:sequence>
                 <xs:element name="side" type="t:Side"/>
                 <xs:element name="small" type="t:Small"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        );
        let side = compiled.schema.find_enumeration("Side").expect("Side");
        assert_eq!(side.id_of("BUY"), Some(0));
        assert_eq!(side.id_of("SELL"), Some(1));
        assert!(compiled.schema.find_enumeration("Small").is_none());

        let order = record(&compiled, "Order");
        let side = order.field("side").expect("side");
        assert_eq!(side.elem_type, ElemType::String);
        assert!(matches!(side.constraint, Some(Constraint::Enumeration(_))));
        let small = order.field("small").expect("small");
        assert_eq!(small.elem_type, ElemType::Int);
        assert!(small.constraint.is_none());
    }

    #[test]
    fn test_duplicate_enumerator_is_a_warning() {
        let compiled = compile(
            r#"<xs:simpleType name="Dup"><xs:restriction base="xs:string">
                 <xs:enumeration value="A"/>
                 <xs:enumeration value="A"/>
               </xs:restriction></xs:simpleType>
               <xs:element name="R"><xs:complexType><xs:sequence>
                 <xs:element name="d" type="t:Dup"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        );
        assert_eq!(compiled.diagnostic.severity(), Severity::Warning);
        let dup = compiled.schema.find_enumeration("Dup").expect("Dup");
        assert_eq!(dup.enumerators.len(), 1);
    }

    #[test]
    fn test_attributes_precede_elements() {
        let compiled = compile(
            r#"<xs:element name="R"><xs:complexType>
                 <xs:sequence><xs:element name="e" type="xs:int"/></xs:sequence>
                 <xs:attribute name="a" type="xs:int" use="required"/>
               </xs:complexType></xs:element>"#,
        );
        let r = record(&compiled, "R");
        assert_eq!(field_names(r), ["a", "e"]);
        assert!(r.fields[0].formatting_mode.contains(FormattingMode::ATTRIBUTE));
        assert!(!r.fields[0].nullable);
    }

    #[test]
    fn test_nested_records_and_choice() {
        let compiled = compile(
            r#"<xs:complexType name="Leg"><xs:sequence>
                 <xs:element name="qty" type="xs:long"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="Side"><xs:choice>
                 <xs:element name="buy" type="xs:int"/>
                 <xs:element name="sell" type="xs:int"/>
               </xs:choice></xs:complexType>
               <xs:element name="Order"><xs:complexType><xs:sequence>
                 <xs:element name="legs" type="t:Leg" maxOccurs="4"/>
                 <xs:element name="side" type="t:Side"/>
                 <xs:element name="first" type="t:Leg" minOccurs="0"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        );
        let order = record(&compiled, "Order");
        let legs = order.field("legs").expect("legs");
        assert_eq!(legs.elem_type, ElemType::Table);
        let side = order.field("side").expect("side");
        assert_eq!(side.elem_type, ElemType::Choice);
        let first = order.field("first").expect("first");
        assert_eq!(first.elem_type, ElemType::List);
        assert!(first.nullable);

        assert_eq!(record(&compiled, "Side").kind, RecordKind::Choice);
        assert_eq!(legs.constraint, first.constraint);
    }

    #[test]
    fn test_repeated_choice_becomes_untagged_field() {
        let compiled = compile(
            r#"<xs:element name="R"><xs:complexType><xs:sequence>
                 <xs:element name="head" type="xs:int"/>
                 <xs:choice maxOccurs="unbounded">
                   <xs:element name="a" type="xs:int"/>
                   <xs:element name="b" type="xs:string"/>
                 </xs:choice>
               </xs:sequence></xs:complexType></xs:element>"#,
        );
        let r = record(&compiled, "R");
        assert_eq!(r.fields.len(), 2);
        let wrapper = &r.fields[1];
        assert!(wrapper.name.is_none());
        assert_eq!(wrapper.elem_type, ElemType::ChoiceArray);
        assert!(wrapper.formatting_mode.contains(FormattingMode::UNTAGGED));
        let Some(Constraint::Record(inner)) = wrapper.constraint else {
            panic!("wrapper must be constrained by a record");
        };
        let inner = compiled.schema.record(inner);
        assert!(inner.name.is_none());
        assert_eq!(inner.kind, RecordKind::Choice);
        assert_eq!(field_names(inner), ["a", "b"]);
    }

    #[test]
    fn test_nillable_array_is_wrapped() {
        let compiled = compile(&holder(
            r#"<xs:element name="values" type="xs:int" maxOccurs="unbounded" nillable="true"/>"#,
        ));
        let values = record(&compiled, "Holder").field("values").expect("values");
        assert_eq!(values.elem_type, ElemType::Table);
        assert!(values.formatting_mode.contains(FormattingMode::NILLABLE));
        let Some(Constraint::Record(wrapper)) = values.constraint else {
            panic!("nillable array must be wrapped");
        };
        let wrapper = compiled.schema.record(wrapper);
        assert!(wrapper.name.is_none());
        assert_eq!(wrapper.fields.len(), 1);
        assert_eq!(wrapper.fields[0].elem_type, ElemType::Int);
        assert_eq!(wrapper.fields[0].formatting_mode, FormattingMode::NILLABLE);
    }

    #[test]
    fn test_list_type_field() {
        let compiled = compile(r#"<xs:simpleType name="Ints"><xs:list itemType="xs:int"/></xs:simpleType>"#);
        assert!(compiled.schema.records().is_empty());

        let compiled = compile(&format!(
            r#"<xs:simpleType name="Ints"><xs:list itemType="xs:int"/></xs:simpleType>{}"#,
            holder(r#"<xs:element name="ids" type="t:Ints"/>"#)
        ));
        let ids = record(&compiled, "Holder").field("ids").expect("ids");
        assert_eq!(ids.elem_type, ElemType::IntArray);
        assert!(ids.formatting_mode.contains(FormattingMode::LIST));
    }

    #[test]
    fn test_name_collision() {
        let error = compile_err(
            r#"<xs:complexType name="X"><xs:sequence><xs:element name="a" type="xs:int"/></xs:sequence></xs:complexType>
               <xs:complexType name="Y"><xs:sequence><xs:element name="b" type="xs:int"/></xs:sequence></xs:complexType>
               <xs:element name="Y" type="t:X"/>
               <xs:element name="Z"><xs:complexType><xs:sequence><xs:element name="y" type="t:Y"/></xs:sequence></xs:complexType></xs:element>"#,
        );
        assert_eq!(
            error.message(),
            "A type and a root element both have the name, \"Y,\" but element \"Y\" is not of type \"Y.\""
        );
    }

    #[test]
    fn test_duplicate_field() {
        let error = compile_err(&holder(
            r#"<xs:element name="a" type="xs:int"/><xs:element name="a" type="xs:string"/>"#,
        ));
        assert_eq!(error.message(), "Holder.a is defined twice.");
    }

    #[test]
    fn test_simple_root_produces_no_record() {
        let compiled = compile(r#"<xs:element name="Tag" type="xs:string" minOccurs="0"/>"#);
        assert!(compiled.schema.records().is_empty());
    }

    #[test]
    fn test_schema_attributes_are_kept() {
        let compiled = compile("");
        assert_eq!(
            compiled.attributes.get("xmlns:t").map(String::as_str),
            Some("urn:t")
        );
        assert_eq!(
            compiled.attributes.get("targetNamespace").map(String::as_str),
            Some("urn:t")
        );
    }

    fn counting_resolver(
        documents: MemoryResolver,
    ) -> (
        impl FnMut(&str, &str) -> Option<Box<dyn Read>> + 'static,
        Rc<RefCell<Vec<String>>>,
    ) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut documents = documents;
        let resolver = move |location: &str, namespace: &str| -> Option<Box<dyn Read>> {
            log.borrow_mut().push(location.to_string());
            documents.resolve(location, namespace)
        };
        (resolver, seen)
    }

    #[test]
    fn test_diamond_include_is_read_once() {
        let top = schema(
            r#"<xs:include schemaLocation="b.xsd"/>
               <xs:include schemaLocation="c.xsd"/>
               <xs:element name="Root" type="t:D"/>"#,
        );
        let documents = MemoryResolver::new()
            .with("b.xsd", schema(r#"<xs:include schemaLocation="d.xsd"/>"#))
            .with("c.xsd", schema(r#"<xs:include schemaLocation="d.xsd"/>"#))
            .with(
                "d.xsd",
                schema(
                    r#"<xs:complexType name="D"><xs:sequence>
                         <xs:element name="v" type="xs:int"/>
                       </xs:sequence></xs:complexType>"#,
                ),
            );
        let (resolver, seen) = counting_resolver(documents);

        let compiled = SchemaParser::new()
            .resolver(resolver)
            .parse_str(&top, "a.xsd")
            .expect("compile");
        assert_eq!(*seen.borrow(), ["b.xsd", "c.xsd", "d.xsd"]);
        assert_eq!(field_names(record(&compiled, "Root")), ["v"]);
    }

    #[test]
    fn test_include_without_target_namespace() {
        let top = schema(
            r#"<xs:include schemaLocation="types.xsd"/><xs:element name="Root" type="t:T"/>"#,
        );
        let types = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="T"><xs:sequence><xs:element name="v" type="xs:int"/></xs:sequence></xs:complexType>
               </xs:schema>"#;
        let compiled = SchemaParser::new()
            .resolver(MemoryResolver::new().with("types.xsd", types))
            .parse_str(&top, "a.xsd")
            .expect("compile");
        assert_eq!(field_names(record(&compiled, "Root")), ["v"]);
    }

    #[test]
    fn test_cyclic_include_fails() {
        let top = schema(r#"<xs:include schemaLocation="b.xsd"/>"#);
        let resolver = MemoryResolver::new()
            .with("b.xsd", schema(r#"<xs:include schemaLocation="a.xsd"/>"#))
            .with("a.xsd", top.clone());
        let error = SchemaParser::new()
            .resolver(resolver)
            .parse_str(&top, "a.xsd")
            .expect_err("cycle");
        assert_eq!(error.info().message(), "Recursive inclusion of schema 'a.xsd'");
        assert_eq!(error.info().source(), "b.xsd");
    }

    #[test]
    fn test_import_namespace_mismatch() {
        let top = schema(r#"<xs:import namespace="urn:x" schemaLocation="x.xsd"/>"#);
        let other = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:y"/>"#;
        let error = SchemaParser::new()
            .resolver(MemoryResolver::new().with("x.xsd", other))
            .parse_str(&top, "a.xsd")
            .expect_err("mismatch");
        assert_eq!(
            error.info().message(),
            "Bad target namespace: got 'urn:y', expected 'urn:x' schemaLocation='x.xsd'"
        );
    }

    #[test]
    fn test_unresolved_schema() {
        let top = schema(r#"<xs:include schemaLocation="missing.xsd"/>"#);
        let error = SchemaParser::new()
            .parse_str(&top, "a.xsd")
            .expect_err("unresolved");
        assert_eq!(
            error.info().message(),
            "Unable to resolve external schema for the schemaLocation = missing.xsd"
        );
    }

    #[test]
    fn test_empty_import_location_is_not_resolved() {
        let top = schema(r#"<xs:import namespace="urn:other"/>"#);
        let (resolver, seen) = counting_resolver(MemoryResolver::new());
        SchemaParser::new()
            .resolver(resolver)
            .parse_str(&top, "a.xsd")
            .expect("compile");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let error = SchemaParser::new()
            .parse(&mut Cursor::new(b"<xs:schema".to_vec()), "bad.xsd")
            .expect_err("malformed");
        assert_eq!(error.info().severity(), Severity::Fatal);
        assert_eq!(error.info().source(), "bad.xsd");
    }

    #[test]
    fn test_allow_unsupported_extension() {
        let body = r#"<xs:element name="Price"><xs:complexType><xs:simpleContent>
                 <xs:extension base="xs:double">
                   <xs:attribute name="currency" type="xs:string"/>
                 </xs:extension>
               </xs:simpleContent></xs:complexType></xs:element>"#;
        let error = SchemaParser::new()
            .allow_unsupported(false)
            .parse_str(&schema(body), "test.xsd")
            .expect_err("unsupported");
        assert_eq!(error.info().message(), "Unsupported schema element: extension");

        let compiled = SchemaParser::new()
            .allow_unsupported(true)
            .parse_str(&schema(body), "test.xsd")
            .expect("compile");
        let price = record(&compiled, "Price");
        assert_eq!(field_names(price), ["currency"]);
    }

    #[test]
    fn test_compile_schema() {
        let compiled = compile_schema(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="R"><xs:complexType><xs:sequence>
                   <xs:element name="v" type="xs:int"/>
                 </xs:sequence></xs:complexType></xs:element>
               </xs:schema>"#,
        )
        .expect("compile");
        assert_eq!(compiled.target_namespace, "");
        assert_eq!(field_names(record(&compiled, "R")), ["v"]);
    }

    #[test]
    fn test_compile_with_trace_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
            .with_test_writer()
            .finish();
        let compiled = tracing::subscriber::with_default(subscriber, || {
            compile(
                r#"<xs:element name="Point"><xs:complexType><xs:sequence>
                     <xs:element name="x" type="xs:double" default="1.5"/>
                   </xs:sequence></xs:complexType></xs:element>"#,
            )
        });
        assert_eq!(field_names(record(&compiled, "Point")), ["x"]);
    }
}
