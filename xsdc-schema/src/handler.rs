//! Content handler turning schema document tags into the schema model.
//!
//! The handler keeps the state of one compile session: the model, the
//! document worklist, the stacks of elements and types being defined, the
//! stack of open tags, and the diagnostic slot. Each document is read with a
//! [`TokenReader`]; start and end tags are validated against the tag table
//! and then handed to the action for the tag.

use crate::builtins::{self, COMPLEX_TYPE_DESCRIPTOR};
use crate::dispatch::{self, EndAction, StartAction, Tag};
use crate::error::{ErrorInfo, SchemaError, Severity};
use crate::external::{ExternalSchemaInfo, Inclusion, SchemaKind, SchemaWorklist};
use crate::generator::SchemaGenerator;
use crate::model::{ElementId, QualifiedSymbol, SchemaModel, TypeId};
use crate::namespace::{NamespaceId, NamespaceRegistry};
use crate::parser::CompileOptions;
use crate::reader::{Advance, NodeType, TokenReader};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::Level;
use xsdc_core::{ElemType, FormattingMode, Schema};

/// Field name of the synthetic field holding a wrapper record.
const UNTAGGED_FIELD: &str = "UNTAGGED";

/// State of one compile session.
pub struct ContentHandler {
    options: CompileOptions,
    registry: NamespaceRegistry,
    model: SchemaModel,
    worklist: SchemaWorklist,
    element_stack: Vec<ElementId>,
    type_stack: Vec<TypeId>,
    descriptor_stack: Vec<Tag>,
    skip_depth: usize,
    schema_attributes: BTreeMap<String, String>,
    error: ErrorInfo,
    line: usize,
    column: usize,
}

impl ContentHandler {
    /// Creates a session for the document at `location`.
    #[must_use]
    pub fn new(location: &str, options: CompileOptions) -> Self {
        Self {
            options,
            registry: NamespaceRegistry::new(),
            model: SchemaModel::new(),
            worklist: SchemaWorklist::new(ExternalSchemaInfo::top_level(location)),
            element_stack: Vec::new(),
            type_stack: Vec::new(),
            descriptor_stack: Vec::new(),
            skip_depth: 0,
            schema_attributes: BTreeMap::new(),
            error: ErrorInfo::new(),
            line: 0,
            column: 0,
        }
    }

    /// Returns the accumulated diagnostic.
    #[must_use]
    pub fn error(&self) -> &ErrorInfo {
        &self.error
    }

    /// Returns the document worklist.
    #[must_use]
    pub fn worklist(&self) -> &SchemaWorklist {
        &self.worklist
    }

    /// Moves to the next queued document.
    pub fn advance_document(&mut self) -> bool {
        self.worklist.advance()
    }

    /// Returns the namespace registry.
    #[must_use]
    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    /// Returns the schema model.
    #[must_use]
    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    /// Returns the attributes of the top-level `<schema>` tag.
    #[must_use]
    pub fn schema_attributes(&self) -> &BTreeMap<String, String> {
        &self.schema_attributes
    }

    /// Returns the target namespace URI of the top-level document.
    #[must_use]
    pub fn target_namespace_uri(&self) -> &str {
        self.registry.lookup(self.worklist.top().target_namespace())
    }

    /// Records a diagnostic against the current document and position.
    pub fn set_error(&mut self, error: SchemaError) {
        let source = self.worklist.current().location();
        self.error.record(&error, source, self.line, self.column);
    }

    /// Parses the current document of the worklist.
    ///
    /// Parsing stops at the end of the document or as soon as an error is
    /// recorded.
    pub fn parse_document(&mut self, reader: &mut dyn TokenReader, input: &mut dyn Read) {
        let location = self.worklist.current().location().to_string();
        tracing::debug!(location = %location, "parsing schema document");
        self.descriptor_stack.clear();
        self.skip_depth = 0;
        (self.line, self.column) = (0, 0);

        if let Err(e) = reader.open(input, &location) {
            tracing::debug!(location = %location, error = %e, "cannot read schema document");
            self.set_error(SchemaError::OpenFailed { location });
            return;
        }

        while self.error.severity() < Severity::Error {
            let prefixes = &mut self.worklist.current_mut().prefixes;
            match reader.advance(prefixes, &mut self.registry) {
                Ok(Advance::More) => {}
                Ok(Advance::Done) => break,
                Err(e) => {
                    (self.line, self.column) = (reader.line(), reader.column());
                    self.set_error(SchemaError::Xml {
                        message: e.to_string(),
                    });
                    break;
                }
            }

            match reader.node_type() {
                NodeType::ElementStart => {
                    self.dispatch_start(&*reader);
                    if reader.is_empty_element() && self.error.severity() < Severity::Error {
                        self.dispatch_end(&*reader);
                    }
                }
                NodeType::ElementEnd => self.dispatch_end(&*reader),
                NodeType::Other => {}
            }
        }
        reader.close();
    }

    /// Handles a start tag.
    pub fn dispatch_start(&mut self, reader: &dyn TokenReader) {
        (self.line, self.column) = (reader.line(), reader.column());
        let local_name = reader.local_name();

        if self.skip_depth == 0 && reader.namespace_id() != NamespaceId::XMLSCHEMA {
            self.set_error(SchemaError::UnknownNamespace {
                uri: reader.namespace_uri().to_string(),
                local_name: local_name.to_string(),
            });
            return;
        }

        let tag = match dispatch::lookup(local_name) {
            Some(tag) => tag,
            None if self.skip_depth > 0 => Tag::Null,
            None => {
                self.set_error(SchemaError::UnknownTag {
                    tag: local_name.to_string(),
                });
                return;
            }
        };

        let parent = self.descriptor_stack.last().copied().unwrap_or(Tag::Null);
        if !parent.descriptor().allows(tag) {
            let error = if self.descriptor_stack.is_empty() {
                SchemaError::InvalidRoot {
                    tag: local_name.to_string(),
                }
            } else {
                SchemaError::InvalidContent {
                    tag: local_name.to_string(),
                    parent: parent.name().to_string(),
                    expected: dispatch::expected_children(parent, self.options.allow_unsupported),
                }
            };
            self.set_error(error);
            return;
        }

        self.descriptor_stack.push(tag);
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }

        if tracing::enabled!(Level::TRACE) {
            for index in 0..reader.num_attributes() {
                if let Some(attr) = reader.attribute(index) {
                    tracing::trace!(
                        tag = tag.name(),
                        name = %attr.qualified_name,
                        value = %attr.value,
                        "attribute"
                    );
                }
            }
        }

        if let Err(error) = self.start_action(tag, reader) {
            self.set_error(error);
        }
    }

    /// Handles an end tag.
    pub fn dispatch_end(&mut self, reader: &dyn TokenReader) {
        (self.line, self.column) = (reader.line(), reader.column());
        let Some(tag) = self.descriptor_stack.last().copied() else {
            return;
        };

        if self.skip_depth > 0 {
            self.skip_depth -= 1;
        } else if let Err(error) = self.end_action(tag) {
            self.set_error(error);
        }
        self.descriptor_stack.pop();
    }

    /// Generates the output schema from the model.
    pub fn generate(&mut self, schema: &mut Schema) {
        let source = self.worklist.top().location().to_string();
        (self.line, self.column) = (0, 0);
        SchemaGenerator::new(&mut self.model, schema, &mut self.error, &source).generate();
    }

    fn start_action(&mut self, tag: Tag, reader: &dyn TokenReader) -> Result<(), SchemaError> {
        match tag.descriptor().start {
            StartAction::Bad => self.reject(tag),
            StartAction::Noop => {
                tracing::debug!(tag = tag.name(), "transparent");
                Ok(())
            }
            StartAction::Skip => {
                tracing::debug!(tag = tag.name(), "skipping");
                self.skip_depth += 1;
                Ok(())
            }
            StartAction::Attribute => self.start_element(reader, true),
            StartAction::Element => self.start_element(reader, false),
            StartAction::Record => self.start_record(reader, tag),
            StartAction::Type => self.start_type(reader, tag),
            StartAction::Enumeration => self.start_enumeration(reader),
            StartAction::Extension if self.options.allow_unsupported => {
                self.start_restriction(reader, false)
            }
            StartAction::Extension => self.reject(tag),
            StartAction::Group => {
                self.skip_depth += 1;
                Err(SchemaError::GroupsUnsupported)
            }
            StartAction::Import => self.start_import(reader),
            StartAction::Include => self.start_include(reader),
            StartAction::List => self.start_restriction(reader, true),
            StartAction::Restriction => self.start_restriction(reader, false),
            StartAction::Schema => self.start_schema(reader),
        }
    }

    fn end_action(&mut self, tag: Tag) -> Result<(), SchemaError> {
        match tag.descriptor().end {
            EndAction::Element | EndAction::Attribute => {
                let Some(&element) = self.element_stack.last() else {
                    return Ok(());
                };
                if !self.model.element(element).is_defined() {
                    return Err(SchemaError::UndefinedElement);
                }
                self.element_stack.pop();
                Ok(())
            }
            EndAction::Type => {
                self.type_stack.pop();
                Ok(())
            }
            EndAction::Record => {
                if let Some(&element) = self.element_stack.last()
                    && self
                        .model
                        .element(element)
                        .formatting_mode
                        .contains(FormattingMode::UNTAGGED)
                {
                    self.element_stack.pop();
                    self.type_stack.pop();
                }
                Ok(())
            }
            EndAction::Schema | EndAction::Other => Ok(()),
        }
    }

    fn reject(&mut self, tag: Tag) -> Result<(), SchemaError> {
        self.skip_depth += 1;
        Err(SchemaError::unsupported(tag.name()))
    }

    fn target_namespace(&self) -> NamespaceId {
        self.worklist.current().target_namespace()
    }

    /// Resolves a `prefix:local` attribute value in the current document.
    fn qualified_name(&self, text: Option<&str>) -> Option<QualifiedSymbol> {
        let text = text.filter(|text| !text.is_empty())?;
        let prefixes = &self.worklist.current().prefixes;
        Some(match text.split_once(':') {
            Some((prefix, local)) => {
                QualifiedSymbol::new(prefixes.lookup_namespace_id(prefix), local)
            }
            None => QualifiedSymbol::new(prefixes.lookup_namespace_id(""), text),
        })
    }

    /// Returns the type named `symbol`, creating a forward declaration for a
    /// name in the target namespace.
    fn get_type(&mut self, symbol: QualifiedSymbol) -> Result<TypeId, SchemaError> {
        let (type_id, inserted) = self.model.lookup_or_insert_type(symbol.clone());
        if inserted
            && symbol.namespace_id != self.target_namespace()
            && symbol.namespace_id != NamespaceId::ANONYMOUS
        {
            return Err(SchemaError::NoSuchType {
                name: symbol.local_name,
            });
        }
        if let Some(descriptor) = self.model.schema_type(type_id).descriptor
            && descriptor.elem_type == ElemType::Void
        {
            return Err(SchemaError::UnsupportedBuiltin {
                name: descriptor.name.to_string(),
            });
        }
        Ok(type_id)
    }

    /// Adds an untagged field holding a new anonymous record to `parent` and
    /// makes the pair current.
    fn create_anonymous_untagged_record(&mut self, parent: TypeId) -> (TypeId, ElementId) {
        let symbol = self.model.anonymous_symbol();
        let (record, _) = self.model.lookup_or_insert_type(symbol);
        self.model.schema_type_mut(record).descriptor = Some(&COMPLEX_TYPE_DESCRIPTOR);
        self.type_stack.push(record);

        let element = self.model.new_element();
        let schema_element = self.model.element_mut(element);
        schema_element.set_type(record);
        schema_element
            .formatting_mode
            .insert(FormattingMode::UNTAGGED);
        self.model.add_field(parent, UNTAGGED_FIELD, element);
        self.element_stack.push(element);
        (record, element)
    }

    fn enqueue(&mut self, info: ExternalSchemaInfo) -> Result<(), SchemaError> {
        match self
            .worklist
            .check_existing(info.location(), info.target_namespace())
        {
            Inclusion::New => {
                tracing::debug!(
                    location = info.location(),
                    namespace = self.registry.lookup(info.target_namespace()),
                    kind = ?info.kind(),
                    "queued external schema"
                );
                self.worklist.push(info);
                Ok(())
            }
            Inclusion::Diamond => {
                tracing::debug!(location = info.location(), "schema already included");
                Ok(())
            }
            Inclusion::Recursive => Err(SchemaError::RecursiveInclusion {
                location: info.location().to_string(),
            }),
        }
    }

    fn start_schema(&mut self, reader: &dyn TokenReader) -> Result<(), SchemaError> {
        let uri = attribute(reader, "targetNamespace").unwrap_or("");
        let namespace_id = self.registry.lookup_or_register(uri);
        let current = self.worklist.current();
        tracing::debug!(location = current.location(), namespace = uri, "schema");

        let mismatch = match current.kind() {
            SchemaKind::TopLevel => {
                for index in 0..reader.num_attributes() {
                    if let Some(attr) = reader.attribute(index) {
                        self.schema_attributes
                            .insert(attr.qualified_name.clone(), attr.value.clone());
                    }
                }
                if !namespace_id.is_none() {
                    self.worklist.current_mut().set_target_namespace(namespace_id);
                }
                false
            }
            SchemaKind::Include => {
                !namespace_id.is_none() && namespace_id != current.target_namespace()
            }
            SchemaKind::Import => namespace_id != current.target_namespace(),
        };

        if mismatch {
            let current = self.worklist.current();
            return Err(SchemaError::BadTargetNamespace {
                got: uri.to_string(),
                expected: self.registry.lookup(current.target_namespace()).to_string(),
                location: current.location().to_string(),
            });
        }
        Ok(())
    }

    fn start_element(
        &mut self,
        reader: &dyn TokenReader,
        is_attribute: bool,
    ) -> Result<(), SchemaError> {
        let target_namespace = self.target_namespace();
        let mut name = attribute(reader, "name").unwrap_or("").to_string();

        // Elements nest in types, never directly in elements.
        let top_level = self.type_stack.is_empty();

        let element = if top_level {
            let symbol = QualifiedSymbol::new(target_namespace, name.as_str());
            let element = if is_attribute {
                self.model.top_level_attribute(symbol)
            } else {
                self.model.top_level_element(symbol)
            };
            if self.model.element(element).is_defined() {
                return Err(if is_attribute {
                    SchemaError::DuplicateAttribute { name }
                } else {
                    SchemaError::DuplicateElement { name }
                });
            }
            element
        } else {
            self.model.new_element()
        };
        self.element_stack.push(element);
        tracing::debug!(name = %name, top_level, is_attribute, "element definition");

        if let Some(symbol) = self.qualified_name(attribute(reader, "ref")) {
            if top_level {
                return Err(if is_attribute {
                    SchemaError::TopLevelAttributeRef
                } else {
                    SchemaError::TopLevelElementRef
                });
            }
            let referenced = if is_attribute {
                self.model.top_level_attribute(symbol.clone())
            } else {
                self.model.top_level_element(symbol.clone())
            };
            if !self.model.element(referenced).is_defined()
                && symbol.namespace_id != target_namespace
            {
                return Err(if is_attribute {
                    SchemaError::NoSuchAttribute {
                        name: symbol.local_name,
                    }
                } else {
                    SchemaError::NoSuchElement {
                        name: symbol.local_name,
                    }
                });
            }
            self.model.element_mut(element).set_element_ref(referenced);
            name = symbol.local_name;
        } else if let Some(symbol) = self.qualified_name(attribute(reader, "type")) {
            let type_id = self.get_type(symbol)?;
            self.model.element_mut(element).set_type(type_id);
        }

        if !is_attribute && name.is_empty() {
            return Err(SchemaError::ElementMissingName);
        }

        let min_occurs = attribute(reader, "minOccurs")
            .map(|text| parse_int("minOccurs", text))
            .transpose()?;
        let max_occurs = attribute(reader, "maxOccurs")
            .map(parse_max_occurs)
            .transpose()?;
        let nillable = attribute(reader, "nillable").is_some_and(is_true);
        let default = attribute(reader, "default");
        let fixed = attribute(reader, "fixed");
        if default.is_some() && fixed.is_some() {
            return Err(SchemaError::DefaultAndFixed);
        }
        let id = annotation_attribute(reader, "id")
            .map(|text| parse_int("id", text))
            .transpose()?;
        let use_min_occurs = if is_attribute {
            match attribute(reader, "use").unwrap_or("") {
                "" | "optional" | "prohibited" => Some(0),
                "required" => Some(1),
                _ => return Err(SchemaError::InvalidUse),
            }
        } else {
            None
        };

        let schema_element = self.model.element_mut(element);
        if is_attribute {
            schema_element
                .formatting_mode
                .insert(FormattingMode::ATTRIBUTE);
        }
        if let Some(min_occurs) = use_min_occurs.or(min_occurs) {
            schema_element.min_occurs = min_occurs;
        }
        if let Some(max_occurs) = max_occurs
            && max_occurs > schema_element.max_occurs
        {
            schema_element.max_occurs = max_occurs;
        }
        if nillable {
            schema_element
                .formatting_mode
                .insert(FormattingMode::NILLABLE);
        }
        if let Some(value) = default.or(fixed) {
            schema_element.default_value = value.to_string();
            schema_element.min_occurs = 0;
        }
        if id.is_some() {
            schema_element.id = id;
        }

        if is_attribute && name.is_empty() {
            return Err(SchemaError::AttributeMissingName);
        }

        if !top_level {
            let Some(&parent) = self.type_stack.last() else {
                return Ok(());
            };
            if is_attribute
                && !self.options.allow_unsupported
                && (self.model.is_choice(parent) || self.model.elem_type(parent).is_scalar())
            {
                return Err(SchemaError::AttributeNotSupported);
            }
            self.model.add_field(parent, name, element);
        }
        Ok(())
    }

    /// Collects an enumerator on a type whose nearest built-in base, found
    /// anywhere on its base chain, is `string`. Enumerations of other types
    /// are ignored.
    fn start_enumeration(&mut self, reader: &dyn TokenReader) -> Result<(), SchemaError> {
        let Some(&type_id) = self.type_stack.last() else {
            return Err(SchemaError::EnumerationOutsideType);
        };
        let Some(descriptor) = self.model.descriptor(type_id) else {
            return Ok(());
        };
        if !std::ptr::eq(descriptor, builtins::string_descriptor()) {
            return Ok(());
        }

        let value = attribute(reader, "value").unwrap_or("");
        let id = annotation_attribute(reader, "id")
            .map(|text| parse_int("id", text))
            .transpose()?;
        tracing::debug!(value, ?id, "enumerator");
        self.model
            .schema_type_mut(type_id)
            .add_enumerator(value, id);
        Ok(())
    }

    fn start_type(&mut self, reader: &dyn TokenReader, tag: Tag) -> Result<(), SchemaError> {
        let name = attribute(reader, "name").unwrap_or("");

        // Types nest in elements, never directly in types.
        let top_level = self.element_stack.is_empty();

        let type_id = if top_level {
            if name.is_empty() {
                return Err(SchemaError::TopLevelTypeMissingName);
            }
            let type_id = self.get_type(QualifiedSymbol::new(self.target_namespace(), name))?;
            if self.model.schema_type(type_id).is_defined() {
                return Err(SchemaError::DuplicateType {
                    name: name.to_string(),
                });
            }
            type_id
        } else {
            if !name.is_empty() {
                return Err(SchemaError::NamedLocalType);
            }
            let symbol = self.model.anonymous_symbol();
            let type_id = self.get_type(symbol)?;
            if let Some(&element) = self.element_stack.last() {
                self.model.element_mut(element).set_type(type_id);
            }
            type_id
        };
        tracing::debug!(tag = tag.name(), name, top_level, "type definition");

        if tag == Tag::ComplexType {
            self.model.schema_type_mut(type_id).descriptor = Some(&COMPLEX_TYPE_DESCRIPTOR);
        } else if annotation_attribute(reader, "preserveEnumOrder").is_some_and(is_true) {
            self.model.schema_type_mut(type_id).preserve_enum_ids = true;
        }
        self.type_stack.push(type_id);
        Ok(())
    }

    fn start_record(&mut self, reader: &dyn TokenReader, tag: Tag) -> Result<(), SchemaError> {
        if attribute(reader, "name").is_some() {
            return Err(SchemaError::NamedRecord);
        }
        let min_occurs = attribute(reader, "minOccurs")
            .map(|text| parse_int("minOccurs", text))
            .transpose()?
            .unwrap_or(1);
        let max_occurs = attribute(reader, "maxOccurs")
            .map(parse_max_occurs)
            .transpose()?
            .unwrap_or(1);
        let is_choice = tag == Tag::Choice;

        let parent_tag = self
            .descriptor_stack
            .len()
            .checked_sub(2)
            .map_or(Tag::Null, |index| self.descriptor_stack[index]);

        let (record, parent_element) = match (parent_tag, self.type_stack.last().copied()) {
            (Tag::ComplexType, Some(record)) => {
                let parent_element = self.element_stack.last().copied();
                if is_choice && !self.model.schema_type(record).fields.is_empty() {
                    return Err(SchemaError::ChoiceAfterFields);
                }
                if (parent_element.is_none() && min_occurs < 1) || max_occurs > 1 {
                    let (record, element) = self.create_anonymous_untagged_record(record);
                    (record, Some(element))
                } else {
                    (record, parent_element)
                }
            }
            (Tag::Sequence | Tag::Choice, Some(parent)) => {
                let (record, element) = self.create_anonymous_untagged_record(parent);
                (record, Some(element))
            }
            _ => {
                return Err(SchemaError::RecordContext {
                    tag: tag.name().to_string(),
                });
            }
        };
        tracing::debug!(tag = tag.name(), min_occurs, max_occurs, "record definition");

        self.model.schema_type_mut(record).is_choice = is_choice;
        if let Some(element) = parent_element {
            let element = self.model.element_mut(element);
            element.min_occurs = element.min_occurs.min(min_occurs);
            element.max_occurs = element.max_occurs.max(max_occurs);
        }
        Ok(())
    }

    fn start_restriction(&mut self, reader: &dyn TokenReader, list: bool) -> Result<(), SchemaError> {
        let Some(&type_id) = self.type_stack.last() else {
            return Err(if list {
                SchemaError::ListOutsideType
            } else {
                SchemaError::RestrictionOutsideType
            });
        };
        let base_attribute = if list { "itemType" } else { "base" };
        let Some(symbol) = self.qualified_name(attribute(reader, base_attribute)) else {
            return Err(if list {
                SchemaError::MissingItemType
            } else {
                SchemaError::MissingBase
            });
        };

        let base = self.get_type(symbol)?;
        if self.model.base_chain_contains(base, type_id) {
            return Err(SchemaError::RecursiveDerivation {
                name: self.model.schema_type(type_id).symbol.local_name.clone(),
            });
        }
        tracing::debug!(
            base = %self.model.schema_type(base).symbol,
            list,
            "derivation"
        );

        let schema_type = self.model.schema_type_mut(type_id);
        schema_type.base = Some(base);
        if list {
            schema_type.is_list = true;
        }
        Ok(())
    }

    fn ensure_under_root(&self, tag: Tag) -> Result<(), SchemaError> {
        if self.type_stack.is_empty() && self.element_stack.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::NotUnderRoot {
                tag: tag.name().to_string(),
            })
        }
    }

    fn start_include(&mut self, reader: &dyn TokenReader) -> Result<(), SchemaError> {
        self.ensure_under_root(Tag::Include)?;
        let location = attribute(reader, "schemaLocation").unwrap_or("");
        if location.is_empty() {
            return Err(SchemaError::EmptySchemaLocation);
        }

        let current = self.worklist.current();
        let target_uri = self.registry.lookup(current.target_namespace()).to_string();
        let info = ExternalSchemaInfo::nested(
            SchemaKind::Include,
            self.worklist.current_index(),
            location,
            &target_uri,
            &mut self.registry,
        );
        self.enqueue(info)
    }

    fn start_import(&mut self, reader: &dyn TokenReader) -> Result<(), SchemaError> {
        self.ensure_under_root(Tag::Import)?;
        let current_uri = self.registry.lookup(self.target_namespace()).to_string();
        let location = attribute(reader, "schemaLocation").unwrap_or("");
        let namespace = attribute(reader, "namespace").unwrap_or("");
        if namespace.is_empty() {
            return Err(SchemaError::MissingImportNamespace);
        }
        if namespace == current_uri {
            return Err(SchemaError::ImportOwnNamespace);
        }
        if location.is_empty() {
            tracing::debug!(namespace, "import without schemaLocation");
            return Ok(());
        }

        let info = ExternalSchemaInfo::nested(
            SchemaKind::Import,
            self.worklist.current_index(),
            location,
            namespace,
            &mut self.registry,
        );
        self.enqueue(info)
    }
}

/// Returns an unqualified attribute of the current tag.
fn attribute<'r>(reader: &'r dyn TokenReader, name: &str) -> Option<&'r str> {
    reader
        .lookup_attribute(name, NamespaceId::NONE)
        .map(|attr| attr.value.as_str())
}

/// Returns an attribute of the annotation namespace on the current tag.
fn annotation_attribute<'r>(reader: &'r dyn TokenReader, name: &str) -> Option<&'r str> {
    reader
        .lookup_attribute(name, NamespaceId::ANNOTATION)
        .map(|attr| attr.value.as_str())
}

fn is_true(text: &str) -> bool {
    text == "true" || text == "1"
}

fn parse_int(attribute: &str, text: &str) -> Result<i32, SchemaError> {
    text.trim()
        .parse()
        .map_err(|_| SchemaError::invalid_number(attribute, text))
}

fn parse_max_occurs(text: &str) -> Result<i32, SchemaError> {
    if text == "unbounded" {
        Ok(i32::MAX)
    } else {
        parse_int("maxOccurs", text)
    }
}
