//! Generation of the typed schema from the compiled model.
//!
//! Runs once after every document has been read. The root pass validates
//! the top-level elements and names complex types after the elements using
//! them. The generation pass then walks the complex types reachable from
//! the top-level elements depth first, creating each record before the
//! records of its fields are filled in so forward and mutual references
//! resolve.

use crate::error::{ErrorInfo, SchemaError};
use crate::model::{ElementId, SchemaModel, TypeId};
use crate::namespace::NamespaceId;
use tracing::Level;
use xsdc_core::{
    Constraint, DefaultValue, ElemType, FieldDef, FormattingMode, RecordId, RecordKind, Schema,
};

/// Name prefixes that mark generated names.
const RECORD_PREFIX: &str = "RECORD_";
const ENUMERATION_PREFIX: &str = "ENUMERATION_";
const FIELD_PREFIX: &str = "FIELD_";

/// Builds a [`Schema`] from a [`SchemaModel`].
pub struct SchemaGenerator<'a> {
    model: &'a mut SchemaModel,
    schema: &'a mut Schema,
    error: &'a mut ErrorInfo,
    source: &'a str,
}

impl<'a> SchemaGenerator<'a> {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `model` - Model filled by the content handler
    /// * `schema` - Output schema; cleared before generation
    /// * `error` - Session diagnostic slot
    /// * `source` - Location reported with generation diagnostics
    pub fn new(
        model: &'a mut SchemaModel,
        schema: &'a mut Schema,
        error: &'a mut ErrorInfo,
        source: &'a str,
    ) -> Self {
        Self {
            model,
            schema,
            error,
            source,
        }
    }

    fn set_error(&mut self, error: SchemaError) {
        self.error.record(&error, self.source, 0, 0);
    }

    /// Generates records and enumerations for the top-level elements.
    pub fn generate(&mut self) {
        self.schema.clear();

        for (symbol, element) in self.model.top_level_elements() {
            if let Err(error) = self.check_element("root", &symbol.local_name, element) {
                self.set_error(error);
                return;
            }
            let Some(mut type_id) = self.model.element_type(element) else {
                continue;
            };
            if !self.model.is_complex(type_id) || self.model.schema_type(type_id).symbol == symbol {
                continue;
            }

            // A type used by two root elements gets one copy per element.
            if self.model.schema_type(type_id).override_symbol.is_some() {
                type_id = self.model.clone_type(type_id);
                self.model.element_mut(element).set_type(type_id);
                tracing::debug!(element = %symbol.local_name, "cloned shared type");
            }
            self.model.schema_type_mut(type_id).override_symbol = Some(symbol);
        }

        if tracing::enabled!(Level::TRACE) {
            for type_id in self.model.types_by_symbol() {
                tracing::trace!("Type {}", self.model.display_type(type_id));
            }
        }

        for (_, element) in self.model.top_level_elements() {
            if let Some(type_id) = self.model.element_type(element)
                && self.model.is_complex(type_id)
            {
                self.generate_type_tree(type_id);
            }
        }
    }

    /// Validates the type and occurrence bounds of an element.
    fn check_element(
        &self,
        record: &str,
        name: &str,
        element: ElementId,
    ) -> Result<(), SchemaError> {
        let record = record.to_string();
        let name = name.to_string();
        let schema_element = self.model.element(element);
        if !schema_element.is_defined() {
            return Err(SchemaError::NoTypeSpecified {
                record,
                element: name,
            });
        }
        let Some(type_id) = self.model.element_type(element) else {
            return Err(SchemaError::NoIndirectType {
                record,
                element: name,
            });
        };
        let Some(descriptor) = self.model.descriptor(type_id) else {
            return Err(SchemaError::UndefinedType {
                type_name: self.model.schema_type(type_id).symbol.local_name.clone(),
                record,
                element: name,
            });
        };
        if schema_element.min_occurs < 0 {
            return Err(SchemaError::InvalidMinOccurs {
                record,
                element: name,
            });
        }
        if schema_element.min_occurs > schema_element.max_occurs {
            return Err(SchemaError::MaxBelowMin {
                record,
                element: name,
            });
        }
        if schema_element.max_occurs > 1 && descriptor.elem_type.is_array() {
            return Err(SchemaError::RepeatedArray {
                record,
                element: name,
            });
        }
        Ok(())
    }

    fn generate_type_tree(&mut self, type_id: TypeId) {
        let Some(descriptor) = self.model.descriptor(type_id) else {
            let name = self.model.schema_type(type_id).symbol.local_name.clone();
            self.set_error(SchemaError::NoDefinition { name });
            return;
        };
        if descriptor.is_complex() {
            self.model.sort_attributes_before_elements(type_id);
            self.generate_record(type_id);
        } else if !self.model.schema_type(type_id).enumerators.is_empty() {
            self.generate_enumeration(type_id);
        }
    }

    fn generate_enumeration(&mut self, type_id: TypeId) {
        let schema_type = self.model.schema_type(type_id);
        if schema_type.enumeration.is_some() {
            return;
        }
        let name = schema_type.output_symbol().local_name.clone();
        let unnamed = name.is_empty() || name.starts_with(' ') || name.starts_with(ENUMERATION_PREFIX);

        let enumeration = match self.schema.create_enumeration((!unnamed).then_some(name.as_str())) {
            Ok(enumeration) => enumeration,
            Err(_) => {
                self.set_error(SchemaError::NameCollision { name });
                return;
            }
        };
        tracing::debug!(name = %name, "generated enumeration");

        let schema_type = self.model.schema_type_mut(type_id);
        schema_type.enumeration = Some(enumeration);
        let definition = self.schema.enumeration_mut(enumeration);
        for (value, id) in &schema_type.enumerators {
            if definition.add_enumerator(value.as_str(), *id).is_err() {
                let warning = SchemaError::DuplicateEnumerator {
                    enumeration: name.clone(),
                    name: value.clone(),
                };
                self.error.record(&warning, self.source, 0, 0);
            }
        }
        if !schema_type.preserve_enum_ids {
            definition.alphabetize();
        }
    }

    fn generate_record(&mut self, type_id: TypeId) {
        let schema_type = self.model.schema_type(type_id);
        if schema_type.record.is_some() {
            return;
        }
        let symbol = schema_type.output_symbol();
        let record_name = symbol.local_name.clone();
        let unnamed = record_name.is_empty()
            || symbol.namespace_id == NamespaceId::ANONYMOUS
            || record_name.starts_with(RECORD_PREFIX);
        let kind = if self.model.is_choice(type_id) {
            RecordKind::Choice
        } else {
            RecordKind::Sequence
        };

        let record = match self
            .schema
            .create_record((!unnamed).then_some(record_name.as_str()), kind)
        {
            Ok(record) => record,
            Err(_) => {
                self.set_error(SchemaError::NameCollision { name: record_name });
                return;
            }
        };
        self.model.schema_type_mut(type_id).record = Some(record);
        tracing::debug!(name = %record_name, kind = kind.name(), "generated record");

        // Records of all reachable complex types exist before any field
        // refers to them.
        let fields = self.model.schema_type(type_id).fields.clone();
        for (field_name, element) in &fields {
            let field_type = self.model.element_type(*element);
            if field_type == Some(type_id) {
                continue;
            }
            if let Err(error) = self.check_element(&record_name, field_name, *element) {
                self.set_error(error);
                return;
            }
            if let Some(field_type) = field_type {
                self.generate_type_tree(field_type);
            }
        }

        for (field_name, element) in &fields {
            self.generate_field(record, &record_name, field_name, *element);
        }
    }

    fn generate_field(
        &mut self,
        record: RecordId,
        record_name: &str,
        field_name: &str,
        element: ElementId,
    ) {
        let Some(field_type) = self.model.element_type(element) else {
            return;
        };
        let schema_element = self.model.element(element);
        let unnamed = schema_element
            .formatting_mode
            .contains(FormattingMode::UNTAGGED)
            || field_name.is_empty()
            || field_name.starts_with(FIELD_PREFIX);
        let (min_occurs, max_occurs) = (schema_element.min_occurs, schema_element.max_occurs);
        let id = schema_element.id;
        let default_text = schema_element.default_value.clone();
        let element_mode = schema_element.formatting_mode;

        let mut elem_type = self.model.element_elem_type(element);
        if elem_type == ElemType::Void {
            self.set_error(SchemaError::NoType {
                record: record_name.to_string(),
                field: field_name.to_string(),
            });
            return;
        }

        let mut constraint = None;
        if let Some(nested) = self.model.schema_type(field_type).record {
            elem_type = match (self.schema.record(nested).kind, max_occurs == 1) {
                (RecordKind::Choice, true) => ElemType::Choice,
                (RecordKind::Choice, false) => ElemType::ChoiceArray,
                (RecordKind::Sequence, true) => ElemType::List,
                (RecordKind::Sequence, false) => ElemType::Table,
            };
            constraint = Some(Constraint::Record(nested));
        }

        let Some(descriptor) = self.model.descriptor(field_type) else {
            return;
        };
        let mut formatting_mode = element_mode | descriptor.formatting_mode;
        if self.model.is_list(field_type) {
            formatting_mode.insert(FormattingMode::LIST);
        }

        let mut field = FieldDef::new(elem_type);
        if !default_text.is_empty() && !elem_type.is_aggregate() {
            match DefaultValue::parse(elem_type, &default_text) {
                Ok(value) => field.default_value = Some(value),
                Err(_) => self.set_error(SchemaError::InvalidDefault {
                    value: default_text.clone(),
                    record: record_name.to_string(),
                    field: field_name.to_string(),
                }),
            }
        }

        // Repeated fields are empty arrays when absent and defaulted fields
        // are never absent.
        let nullable = min_occurs == 0 && max_occurs <= 1 && field.default_value.is_none();

        let enumeration = self.model.schema_type(field_type).enumeration;
        if formatting_mode.contains(FormattingMode::NILLABLE)
            && elem_type.is_array()
            && default_text.is_empty()
        {
            // A table of one nillable column lets single items be null.
            let wrapper = match self.schema.create_record(None, RecordKind::Sequence) {
                Ok(wrapper) => wrapper,
                Err(error) => {
                    self.set_error(error.into());
                    return;
                }
            };
            let mut item = FieldDef::new(elem_type.from_array());
            item.formatting_mode = FormattingMode::NILLABLE;
            item.constraint = enumeration.map(Constraint::Enumeration);
            if let Err(error) = self.schema.append_field(wrapper, item) {
                self.set_error(error.into());
                return;
            }
            field = FieldDef::new(ElemType::Table);
            constraint = Some(Constraint::Record(wrapper));
        } else if constraint.is_none()
            && let Some(enumeration) = enumeration
        {
            constraint = Some(Constraint::Enumeration(enumeration));
        }

        field.name = (!unnamed).then(|| field_name.to_string());
        field.id = id;
        field.constraint = constraint;
        field.nullable = nullable;
        field.formatting_mode = formatting_mode;
        if self.schema.append_field(record, field).is_err() {
            self.set_error(SchemaError::DuplicateField {
                record: record_name.to_string(),
                field: field_name.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::model::QualifiedSymbol;

    fn local(name: &str) -> QualifiedSymbol {
        QualifiedSymbol::new(NamespaceId::NONE, name)
    }

    fn builtin(model: &mut SchemaModel, name: &str) -> TypeId {
        model
            .find_type(&QualifiedSymbol::new(NamespaceId::XMLSCHEMA, name))
            .expect("builtin")
    }

    fn generate(model: &mut SchemaModel) -> (Schema, ErrorInfo) {
        let mut schema = Schema::new();
        let mut error = ErrorInfo::new();
        SchemaGenerator::new(model, &mut schema, &mut error, "test.xsd").generate();
        (schema, error)
    }

    fn record_with_field(model: &mut SchemaModel, name: &str, field_type: TypeId) -> ElementId {
        let (record, _) = model.lookup_or_insert_type(local(name));
        let root = model.top_level_element(local(name));
        model.element_mut(root).set_type(record);
        let field = model.new_element();
        model.element_mut(field).set_type(field_type);
        model.add_field(record, "f", field);
        field
    }

    #[test]
    fn test_root_without_type() {
        let mut model = SchemaModel::new();
        model.top_level_element(local("Orphan"));
        let (schema, error) = generate(&mut model);
        assert_eq!(error.severity(), Severity::Error);
        assert_eq!(
            error.message(),
            "No type specified for element \"root.Orphan\"."
        );
        assert_eq!(error.source(), "test.xsd");
        assert!(schema.records().is_empty());
    }

    #[test]
    fn test_undefined_field_type() {
        let mut model = SchemaModel::new();
        let (missing, _) = model.lookup_or_insert_type(local("Missing"));
        record_with_field(&mut model, "R", missing);
        let (_, error) = generate(&mut model);
        assert_eq!(
            error.message(),
            "Undefined type \"Missing\" referenced from element \"R.f\"."
        );
    }

    #[test]
    fn test_repeated_array_rejected() {
        let mut model = SchemaModel::new();
        let hex = builtin(&mut model, "hexBinary");
        let field = record_with_field(&mut model, "R", hex);
        model.element_mut(field).max_occurs = 2;
        let (_, error) = generate(&mut model);
        assert_eq!(
            error.message(),
            "'maxOccurs' is not supported for array types on element \"R.f\"."
        );
    }

    #[test]
    fn test_max_below_min() {
        let mut model = SchemaModel::new();
        let int = builtin(&mut model, "int");
        let field = record_with_field(&mut model, "R", int);
        model.element_mut(field).min_occurs = 3;
        model.element_mut(field).max_occurs = 2;
        let (_, error) = generate(&mut model);
        assert_eq!(
            error.message(),
            "'maxOccurs' value must be greater or equal to 'minOccurs' value for element \"R.f\"."
        );
    }

    #[test]
    fn test_formatting_mode_merges_descriptor() {
        let mut model = SchemaModel::new();
        let base64 = builtin(&mut model, "base64Binary");
        let field = record_with_field(&mut model, "R", base64);
        model
            .element_mut(field)
            .formatting_mode
            .insert(FormattingMode::ATTRIBUTE);
        let (schema, error) = generate(&mut model);
        assert_eq!(error.severity(), Severity::NoError);
        let record = schema.find_record("R").expect("record");
        let field = record.field("f").expect("field");
        assert_eq!(field.elem_type, ElemType::CharArray);
        assert_eq!(field.formatting_mode.encoding(), FormattingMode::BASE64);
        assert!(field.formatting_mode.contains(FormattingMode::ATTRIBUTE));
    }

    #[test]
    fn test_generated_names_are_unnamed() {
        let mut model = SchemaModel::new();
        let int = builtin(&mut model, "int");
        let (record, _) = model.lookup_or_insert_type(local("RECORD_7"));
        let root = model.top_level_element(local("RECORD_7"));
        model.element_mut(root).set_type(record);
        let field = model.new_element();
        model.element_mut(field).set_type(int);
        model.add_field(record, "FIELD_1", field);

        let (schema, error) = generate(&mut model);
        assert_eq!(error.severity(), Severity::NoError);
        assert_eq!(schema.records().len(), 1);
        assert!(schema.records()[0].name.is_none());
        assert!(schema.records()[0].fields[0].name.is_none());
    }

    #[test]
    fn test_direct_recursion() {
        let mut model = SchemaModel::new();
        let (node, _) = model.lookup_or_insert_type(local("Node"));
        let root = model.top_level_element(local("Node"));
        model.element_mut(root).set_type(node);
        let next = model.new_element();
        model.element_mut(next).set_type(node);
        model.element_mut(next).min_occurs = 0;
        model.add_field(node, "next", next);

        let (schema, error) = generate(&mut model);
        assert_eq!(error.severity(), Severity::NoError);
        let record = schema.find_record("Node").expect("record");
        let next = record.field("next").expect("field");
        assert_eq!(next.elem_type, ElemType::List);
        assert!(next.nullable);
        assert!(matches!(next.constraint, Some(Constraint::Record(r)) if r.index() == 0));
    }

    #[test]
    fn test_shared_root_type_is_cloned() {
        let mut model = SchemaModel::new();
        let int = builtin(&mut model, "int");
        let (shared, _) = model.lookup_or_insert_type(local("Shared"));
        let field = model.new_element();
        model.element_mut(field).set_type(int);
        model.add_field(shared, "v", field);
        for name in ["Bar", "Foo"] {
            let root = model.top_level_element(local(name));
            model.element_mut(root).set_type(shared);
        }

        let (schema, error) = generate(&mut model);
        assert_eq!(error.severity(), Severity::NoError);

        let bar_root = model.top_level_element(local("Bar"));
        let foo_root = model.top_level_element(local("Foo"));
        let bar = model.element_type(bar_root).expect("Bar type");
        let foo = model.element_type(foo_root).expect("Foo type");
        assert_eq!(bar, shared);
        assert_ne!(foo, shared);
        assert_eq!(
            model.schema_type(foo).override_symbol,
            Some(local("Foo"))
        );
        assert_ne!(
            model.schema_type(foo).fields.as_ptr(),
            model.schema_type(shared).fields.as_ptr()
        );

        let bar_record = model.schema_type(bar).record.expect("Bar record");
        let foo_record = model.schema_type(foo).record.expect("Foo record");
        assert_ne!(bar_record, foo_record);
        assert_eq!(schema.record(foo_record).name.as_deref(), Some("Foo"));

        let extra = model.new_element();
        model.add_field(foo, "w", extra);
        assert_eq!(model.schema_type(foo).fields.len(), 2);
        assert_eq!(model.schema_type(shared).fields.len(), 1);
    }
}
