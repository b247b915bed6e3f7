//! Typed schema definitions.
//!
//! A [`Schema`] is an ordered collection of records and enumerations. Records
//! hold ordered fields; a field refers to other definitions of the same
//! schema through [`Constraint`] handles.

use crate::error::{Error, Result};
use crate::types::{ElemType, FormattingMode};
use crate::value::DefaultValue;
use std::collections::HashMap;
use std::fmt;

/// Handle to a record within a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    /// Returns the position of the record in the schema.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to an enumeration within a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumerationId(usize);

impl EnumerationId {
    /// Returns the position of the enumeration in the schema.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Kind of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    /// All fields may be present.
    #[default]
    Sequence,
    /// Exactly one field is selected.
    Choice,
}

impl RecordKind {
    /// Returns the canonical upper-case name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sequence => "SEQUENCE",
            Self::Choice => "CHOICE",
        }
    }
}

/// Definition constraining the values of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Field values are instances of a record.
    Record(RecordId),
    /// Field values are enumerators of an enumeration.
    Enumeration(EnumerationId),
}

/// A field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name; `None` for unnamed fields.
    pub name: Option<String>,
    /// Numeric field ID; `None` when not assigned.
    pub id: Option<i32>,
    /// Element type.
    pub elem_type: ElemType,
    /// Nested record or enumeration constraint.
    pub constraint: Option<Constraint>,
    /// Whether the field may be null.
    pub nullable: bool,
    /// Formatting hints.
    pub formatting_mode: FormattingMode,
    /// Default value.
    pub default_value: Option<DefaultValue>,
}

impl FieldDef {
    /// Creates an unnamed, non-nullable field of the given type.
    #[must_use]
    pub fn new(elem_type: ElemType) -> Self {
        Self {
            name: None,
            id: None,
            elem_type,
            constraint: None,
            nullable: false,
            formatting_mode: FormattingMode::DEFAULT,
            default_value: None,
        }
    }

    /// Returns true if the field carries a default value.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

/// A record definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordDef {
    /// Record name; `None` for unnamed records.
    pub name: Option<String>,
    /// Record kind.
    pub kind: RecordKind,
    /// Ordered fields.
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|field| field.name.as_deref() == Some(name))
    }

    /// Looks up a field by ID.
    #[must_use]
    pub fn field_by_id(&self, id: i32) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.id == Some(id))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An enumerator of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Enumerator {
    /// Enumerator literal.
    pub name: String,
    /// Enumerator ID.
    pub id: i32,
}

/// An enumeration definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumerationDef {
    /// Enumeration name; `None` for unnamed enumerations.
    pub name: Option<String>,
    /// Ordered enumerators.
    pub enumerators: Vec<Enumerator>,
}

impl EnumerationDef {
    /// Appends an enumerator.
    ///
    /// # Errors
    /// Returns `Error::DuplicateEnumerator` if the name or ID is already used.
    pub fn add_enumerator(&mut self, name: impl Into<String>, id: i32) -> Result<()> {
        let name = name.into();
        if self
            .enumerators
            .iter()
            .any(|e| e.name == name || e.id == id)
        {
            return Err(Error::DuplicateEnumerator {
                enumeration: self.name.clone().unwrap_or_default(),
                name,
                id,
            });
        }
        self.enumerators.push(Enumerator { name, id });
        Ok(())
    }

    /// Sorts enumerators by literal and renumbers them from zero.
    pub fn alphabetize(&mut self) {
        self.enumerators.sort_by(|a, b| a.name.cmp(&b.name));
        for (id, enumerator) in (0..).zip(self.enumerators.iter_mut()) {
            enumerator.id = id;
        }
    }

    /// Returns the ID of the enumerator with the given literal.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<i32> {
        self.enumerators
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id)
    }

    /// Returns the literal of the enumerator with the given ID.
    #[must_use]
    pub fn name_of(&self, id: i32) -> Option<&str> {
        self.enumerators
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }
}

/// Named definition within a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Definition {
    Record(RecordId),
    Enumeration(EnumerationId),
}

/// Typed schema: ordered records and enumerations.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    records: Vec<RecordDef>,
    enumerations: Vec<EnumerationDef>,
    /// Name lookup shared by records and enumerations.
    names: HashMap<String, Definition>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all definitions.
    pub fn clear(&mut self) {
        self.records.clear();
        self.enumerations.clear();
        self.names.clear();
    }

    /// Creates an empty record.
    ///
    /// # Arguments
    /// * `name` - Record name, or `None` for an unnamed record
    /// * `kind` - Sequence or choice
    ///
    /// # Errors
    /// Returns `Error::DuplicateName` if a record or enumeration with the same
    /// name exists.
    pub fn create_record(&mut self, name: Option<&str>, kind: RecordKind) -> Result<RecordId> {
        let id = RecordId(self.records.len());
        if let Some(name) = name {
            self.claim_name(name, Definition::Record(id))?;
        }
        self.records.push(RecordDef {
            name: name.map(str::to_string),
            kind,
            fields: Vec::new(),
        });
        Ok(id)
    }

    /// Creates an empty enumeration.
    ///
    /// # Errors
    /// Returns `Error::DuplicateName` if a record or enumeration with the same
    /// name exists.
    pub fn create_enumeration(&mut self, name: Option<&str>) -> Result<EnumerationId> {
        let id = EnumerationId(self.enumerations.len());
        if let Some(name) = name {
            self.claim_name(name, Definition::Enumeration(id))?;
        }
        self.enumerations.push(EnumerationDef {
            name: name.map(str::to_string),
            enumerators: Vec::new(),
        });
        Ok(id)
    }

    fn claim_name(&mut self, name: &str, definition: Definition) -> Result<()> {
        if self.names.contains_key(name) {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }
        self.names.insert(name.to_string(), definition);
        Ok(())
    }

    /// Appends a field to a record.
    ///
    /// # Errors
    /// Returns `Error::DuplicateFieldName` or `Error::DuplicateFieldId` if the
    /// record already has a field with the same name or ID.
    pub fn append_field(&mut self, record: RecordId, field: FieldDef) -> Result<&FieldDef> {
        let label = self.record_label(record);
        let target = &mut self.records[record.0];

        if let Some(name) = field.name.as_deref()
            && target.field(name).is_some()
        {
            return Err(Error::DuplicateFieldName {
                record: label,
                field: name.to_string(),
            });
        }
        if let Some(id) = field.id
            && target.field_by_id(id).is_some()
        {
            return Err(Error::DuplicateFieldId { record: label, id });
        }

        target.fields.push(field);
        Ok(&target.fields[target.fields.len() - 1])
    }

    /// Returns a record by handle.
    #[must_use]
    pub fn record(&self, id: RecordId) -> &RecordDef {
        &self.records[id.0]
    }

    /// Returns a mutable record by handle.
    pub fn record_mut(&mut self, id: RecordId) -> &mut RecordDef {
        &mut self.records[id.0]
    }

    /// Returns an enumeration by handle.
    #[must_use]
    pub fn enumeration(&self, id: EnumerationId) -> &EnumerationDef {
        &self.enumerations[id.0]
    }

    /// Returns a mutable enumeration by handle.
    pub fn enumeration_mut(&mut self, id: EnumerationId) -> &mut EnumerationDef {
        &mut self.enumerations[id.0]
    }

    /// Looks up the handle of a record by name.
    #[must_use]
    pub fn find_record_id(&self, name: &str) -> Option<RecordId> {
        match self.names.get(name) {
            Some(Definition::Record(id)) => Some(*id),
            _ => None,
        }
    }

    /// Looks up a record by name.
    #[must_use]
    pub fn find_record(&self, name: &str) -> Option<&RecordDef> {
        self.find_record_id(name).map(|id| self.record(id))
    }

    /// Looks up an enumeration by name.
    #[must_use]
    pub fn find_enumeration(&self, name: &str) -> Option<&EnumerationDef> {
        match self.names.get(name) {
            Some(Definition::Enumeration(id)) => Some(self.enumeration(*id)),
            _ => None,
        }
    }

    /// Returns all records in creation order.
    #[must_use]
    pub fn records(&self) -> &[RecordDef] {
        &self.records
    }

    /// Returns all enumerations in creation order.
    #[must_use]
    pub fn enumerations(&self) -> &[EnumerationDef] {
        &self.enumerations
    }

    /// Returns the display label of a record: its name, or `#index`.
    #[must_use]
    pub fn record_label(&self, id: RecordId) -> String {
        self.records[id.0]
            .name
            .clone()
            .unwrap_or_else(|| format!("#{}", id.0))
    }

    /// Returns the display label of an enumeration: its name, or `#index`.
    #[must_use]
    pub fn enumeration_label(&self, id: EnumerationId) -> String {
        self.enumerations[id.0]
            .name
            .clone()
            .unwrap_or_else(|| format!("#{}", id.0))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, record) in self.records.iter().enumerate() {
            writeln!(
                f,
                "{} RECORD {} {{",
                record.kind.name(),
                self.record_label(RecordId(index))
            )?;
            for field in &record.fields {
                write!(
                    f,
                    "    {} {}",
                    field.elem_type,
                    field.name.as_deref().unwrap_or("(unnamed)")
                )?;
                if let Some(id) = field.id {
                    write!(f, " id={id}")?;
                }
                match field.constraint {
                    Some(Constraint::Record(id)) => write!(f, " -> {}", self.record_label(id))?,
                    Some(Constraint::Enumeration(id)) => {
                        write!(f, " -> {}", self.enumeration_label(id))?
                    }
                    None => {}
                }
                if field.nullable {
                    f.write_str(" nullable")?;
                }
                if let Some(value) = &field.default_value {
                    write!(f, " default={value}")?;
                }
                if field.formatting_mode != FormattingMode::DEFAULT {
                    write!(f, " fmt={}", field.formatting_mode)?;
                }
                writeln!(f)?;
            }
            writeln!(f, "}}")?;
        }
        for (index, enumeration) in self.enumerations.iter().enumerate() {
            writeln!(
                f,
                "ENUMERATION {} {{",
                self.enumeration_label(EnumerationId(index))
            )?;
            for enumerator in &enumeration.enumerators {
                writeln!(f, "    {} = {}", enumerator.name, enumerator.id)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}
