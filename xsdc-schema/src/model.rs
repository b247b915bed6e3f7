//! In-memory model of the schema being compiled.
//!
//! Elements, attributes and types live in arenas owned by [`SchemaModel`] and
//! are referred to by [`ElementId`] and [`TypeId`] handles. A name seen
//! before its definition gets an empty entry that is filled in place when
//! the definition arrives, so handles taken early stay valid.

use crate::builtins::{self, COMPLEX_TYPE_DESCRIPTOR, XmlTypeDescriptor};
use crate::namespace::NamespaceId;
use std::collections::BTreeMap;
use std::fmt;
use xsdc_core::{ElemType, EnumerationId, FormattingMode, RecordId};

/// A namespace-qualified name.
///
/// Symbols order by namespace ID, then by local name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedSymbol {
    /// Namespace of the name.
    pub namespace_id: NamespaceId,
    /// Local part of the name.
    pub local_name: String,
}

impl QualifiedSymbol {
    /// Creates a symbol.
    pub fn new(namespace_id: NamespaceId, local_name: impl Into<String>) -> Self {
        Self {
            namespace_id,
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QualifiedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_id, self.local_name)
    }
}

/// Handle of a [`SchemaElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

/// Handle of a [`SchemaType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(usize);

/// An `<element>` or `<attribute>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaElement {
    direct_type: Option<TypeId>,
    element_ref: Option<ElementId>,
    /// Attribute, untagged and nillable flags.
    pub formatting_mode: FormattingMode,
    /// Text of the `default` or `fixed` attribute.
    pub default_value: String,
    /// Value of the annotation `id` attribute.
    pub id: Option<i32>,
    /// Minimum number of occurrences.
    pub min_occurs: i32,
    /// Maximum number of occurrences; `i32::MAX` when unbounded.
    pub max_occurs: i32,
}

impl Default for SchemaElement {
    fn default() -> Self {
        Self {
            direct_type: None,
            element_ref: None,
            formatting_mode: FormattingMode::DEFAULT,
            default_value: String::new(),
            id: None,
            min_occurs: 1,
            max_occurs: 1,
        }
    }
}

impl SchemaElement {
    /// Returns true once the element has a type or refers to another element.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.direct_type.is_some() || self.element_ref.is_some()
    }

    /// Sets the type of the element.
    pub fn set_type(&mut self, type_id: TypeId) {
        self.direct_type = Some(type_id);
    }

    /// Makes the element a reference to another element.
    pub fn set_element_ref(&mut self, element: ElementId) {
        self.element_ref = Some(element);
    }

    /// Returns the type assigned directly to this element.
    #[must_use]
    pub const fn direct_type(&self) -> Option<TypeId> {
        self.direct_type
    }

    /// Returns the referenced element.
    #[must_use]
    pub const fn element_ref(&self) -> Option<ElementId> {
        self.element_ref
    }

    /// Returns true if the element is an attribute.
    #[must_use]
    pub const fn is_attribute(&self) -> bool {
        self.formatting_mode.contains(FormattingMode::ATTRIBUTE)
    }
}

/// A `<simpleType>` or `<complexType>` definition, or a built-in type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaType {
    /// Name of the type.
    pub symbol: QualifiedSymbol,
    /// Name of the top-level element the output definition is named after.
    pub override_symbol: Option<QualifiedSymbol>,
    /// Base type of a restriction, extension or list.
    pub base: Option<TypeId>,
    /// Built-in descriptor; found through the base chain when unset.
    pub descriptor: Option<&'static XmlTypeDescriptor>,
    /// The type is a `<list>`.
    pub is_list: bool,
    /// The type is a `<choice>`.
    pub is_choice: bool,
    /// Largest value or length; zero when inherited.
    pub max_value: u64,
    /// Fields in declaration order.
    pub fields: Vec<(String, ElementId)>,
    /// Enumerator literals and IDs in declaration order.
    pub enumerators: Vec<(String, i32)>,
    /// Keep enumerator IDs as declared instead of alphabetizing.
    pub preserve_enum_ids: bool,
    /// Generated record.
    pub record: Option<RecordId>,
    /// Generated enumeration.
    pub enumeration: Option<EnumerationId>,
}

impl SchemaType {
    /// Creates an empty type.
    #[must_use]
    pub fn new(symbol: QualifiedSymbol) -> Self {
        Self {
            symbol,
            override_symbol: None,
            base: None,
            descriptor: None,
            is_list: false,
            is_choice: false,
            max_value: 0,
            fields: Vec::new(),
            enumerators: Vec::new(),
            preserve_enum_ids: false,
            record: None,
            enumeration: None,
        }
    }

    /// Returns true once the type has a descriptor or a base type.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.descriptor.is_some() || self.base.is_some()
    }

    /// Appends an enumerator.
    ///
    /// Without an explicit ID the enumerator gets the previous ID plus one,
    /// or zero if it is the first. An explicit ID keeps the declared order.
    pub fn add_enumerator(&mut self, value: impl Into<String>, id: Option<i32>) {
        let id = match id {
            Some(id) => {
                self.preserve_enum_ids = true;
                id
            }
            None => self
                .enumerators
                .last()
                .map_or(0, |(_, last)| last.saturating_add(1)),
        };
        self.enumerators.push((value.into(), id));
    }

    /// Returns the name of the output definition.
    #[must_use]
    pub fn output_symbol(&self) -> &QualifiedSymbol {
        self.override_symbol.as_ref().unwrap_or(&self.symbol)
    }
}

/// Arena and symbol tables of a compile session.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    elements: Vec<SchemaElement>,
    types: Vec<SchemaType>,
    type_table: BTreeMap<QualifiedSymbol, TypeId>,
    top_level_elements: BTreeMap<QualifiedSymbol, ElementId>,
    top_level_attributes: BTreeMap<QualifiedSymbol, ElementId>,
    anonymous_count: u32,
}

impl Default for SchemaModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaModel {
    /// Creates a model holding the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let mut model = Self {
            elements: Vec::new(),
            types: Vec::new(),
            type_table: BTreeMap::new(),
            top_level_elements: BTreeMap::new(),
            top_level_attributes: BTreeMap::new(),
            anonymous_count: 0,
        };
        for descriptor in &builtins::KNOWN_TYPES {
            let mut builtin =
                SchemaType::new(QualifiedSymbol::new(NamespaceId::XMLSCHEMA, descriptor.name));
            builtin.descriptor = Some(descriptor);
            builtin.max_value = descriptor.max_value;
            model.add_type(builtin);
        }
        model
    }

    /// Mints a unique symbol in the anonymous namespace.
    ///
    /// Minted names start with a space so they never clash with, or read
    /// as, a name written in a document.
    pub fn anonymous_symbol(&mut self) -> QualifiedSymbol {
        self.anonymous_count += 1;
        QualifiedSymbol::new(
            NamespaceId::ANONYMOUS,
            format!(" {:06}_ANON", self.anonymous_count),
        )
    }

    /// Copies a type under a fresh anonymous symbol.
    ///
    /// The copy shares field elements with the original but has its own
    /// field list and no generated output.
    pub fn clone_type(&mut self, id: TypeId) -> TypeId {
        let symbol = self.anonymous_symbol();
        let mut copy = self.types[id.0].clone();
        copy.symbol = symbol;
        copy.override_symbol = None;
        copy.record = None;
        copy.enumeration = None;
        self.add_type(copy)
    }

    /// Allocates an element that is not in any symbol table.
    pub fn new_element(&mut self) -> ElementId {
        self.elements.push(SchemaElement::default());
        ElementId(self.elements.len() - 1)
    }

    /// Returns the top-level element named `symbol`, inserting it if absent.
    pub fn top_level_element(&mut self, symbol: QualifiedSymbol) -> ElementId {
        if let Some(id) = self.top_level_elements.get(&symbol) {
            return *id;
        }
        let id = self.new_element();
        self.top_level_elements.insert(symbol, id);
        id
    }

    /// Returns the top-level attribute named `symbol`, inserting it if absent.
    pub fn top_level_attribute(&mut self, symbol: QualifiedSymbol) -> ElementId {
        if let Some(id) = self.top_level_attributes.get(&symbol) {
            return *id;
        }
        let id = self.new_element();
        self.top_level_attributes.insert(symbol, id);
        id
    }

    /// Returns the top-level elements in symbol order.
    #[must_use]
    pub fn top_level_elements(&self) -> Vec<(QualifiedSymbol, ElementId)> {
        self.top_level_elements
            .iter()
            .map(|(symbol, id)| (symbol.clone(), *id))
            .collect()
    }

    /// Returns the type named `symbol`, inserting an empty one if absent.
    ///
    /// # Returns
    /// The handle and `true` if the type was inserted.
    pub fn lookup_or_insert_type(&mut self, symbol: QualifiedSymbol) -> (TypeId, bool) {
        if let Some(id) = self.type_table.get(&symbol) {
            return (*id, false);
        }
        (self.add_type(SchemaType::new(symbol)), true)
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn find_type(&self, symbol: &QualifiedSymbol) -> Option<TypeId> {
        self.type_table.get(symbol).copied()
    }

    /// Adds a type under its own symbol.
    pub fn add_type(&mut self, schema_type: SchemaType) -> TypeId {
        let id = TypeId(self.types.len());
        self.type_table.insert(schema_type.symbol.clone(), id);
        self.types.push(schema_type);
        id
    }

    /// Returns an element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> &SchemaElement {
        &self.elements[id.0]
    }

    /// Returns a mutable element.
    pub fn element_mut(&mut self, id: ElementId) -> &mut SchemaElement {
        &mut self.elements[id.0]
    }

    /// Returns a type.
    #[must_use]
    pub fn schema_type(&self, id: TypeId) -> &SchemaType {
        &self.types[id.0]
    }

    /// Returns a mutable type.
    pub fn schema_type_mut(&mut self, id: TypeId) -> &mut SchemaType {
        &mut self.types[id.0]
    }

    /// Returns all types in symbol order.
    pub fn types_by_symbol(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.type_table.values().copied()
    }

    /// Returns the type of an element, following element references.
    #[must_use]
    pub fn element_type(&self, id: ElementId) -> Option<TypeId> {
        let mut current = &self.elements[id.0];
        for _ in 0..self.elements.len() {
            match current.element_ref {
                Some(next) => current = &self.elements[next.0],
                None => return current.direct_type,
            }
        }
        None
    }

    /// Returns `id` followed by its base types, nearest first.
    ///
    /// The walk stops after visiting every type once, so it terminates even
    /// on a corrupt chain.
    pub fn base_chain(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(Some(id), |t| self.types[t.0].base).take(self.types.len())
    }

    /// Returns the last type of the base chain.
    #[must_use]
    pub fn most_base(&self, id: TypeId) -> TypeId {
        self.base_chain(id).last().unwrap_or(id)
    }

    /// Returns true if `target` is on the base chain of `id`, `id` included.
    #[must_use]
    pub fn base_chain_contains(&self, id: TypeId, target: TypeId) -> bool {
        self.base_chain(id).any(|t| t == target)
    }

    /// Returns the nearest descriptor on the base chain.
    #[must_use]
    pub fn descriptor(&self, id: TypeId) -> Option<&'static XmlTypeDescriptor> {
        self.base_chain(id).find_map(|t| self.types[t.0].descriptor)
    }

    /// Returns true if the type is complex.
    #[must_use]
    pub fn is_complex(&self, id: TypeId) -> bool {
        self.descriptor(id).is_some_and(XmlTypeDescriptor::is_complex)
    }

    /// Returns true if the type or a base type is a list.
    #[must_use]
    pub fn is_list(&self, id: TypeId) -> bool {
        self.base_chain(id).any(|t| self.types[t.0].is_list)
    }

    /// Returns true if the type or a base type is a choice.
    #[must_use]
    pub fn is_choice(&self, id: TypeId) -> bool {
        self.base_chain(id).any(|t| self.types[t.0].is_choice)
    }

    /// Returns the nearest non-zero maximum value on the base chain.
    #[must_use]
    pub fn max_value(&self, id: TypeId) -> u64 {
        self.base_chain(id)
            .map(|t| self.types[t.0].max_value)
            .find(|&max| max != 0)
            .unwrap_or(0)
    }

    /// Returns the element type of values of the type.
    #[must_use]
    pub fn elem_type(&self, id: TypeId) -> ElemType {
        match self.descriptor(id) {
            None => ElemType::Void,
            Some(descriptor) if self.is_list(id) => descriptor.elem_type.widen_to_array(),
            Some(descriptor) => descriptor.elem_type,
        }
    }

    /// Returns the element type of an element's values, taking repetition
    /// into account.
    #[must_use]
    pub fn element_elem_type(&self, id: ElementId) -> ElemType {
        let Some(type_id) = self.element_type(id) else {
            return ElemType::Void;
        };
        let elem_type = self.elem_type(type_id);
        if self.elements[id.0].max_occurs > 1 {
            elem_type.widen_to_array()
        } else {
            elem_type
        }
    }

    /// Appends a field to a type, making the type complex.
    pub fn add_field(&mut self, type_id: TypeId, name: impl Into<String>, element: ElementId) {
        let schema_type = &mut self.types[type_id.0];
        schema_type.fields.push((name.into(), element));
        schema_type.descriptor = Some(&COMPLEX_TYPE_DESCRIPTOR);
    }

    /// Moves attribute fields ahead of element fields, keeping the relative
    /// order within each group.
    pub fn sort_attributes_before_elements(&mut self, type_id: TypeId) {
        let mut fields = std::mem::take(&mut self.types[type_id.0].fields);
        fields.sort_by_key(|(_, element)| !self.elements[element.0].is_attribute());
        self.types[type_id.0].fields = fields;
    }

    /// Returns a displayable dump of a type.
    #[must_use]
    pub fn display_type(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { model: self, id }
    }
}

/// Multi-line dump of a [`SchemaType`].
pub struct TypeDisplay<'a> {
    model: &'a SchemaModel,
    id: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;
        let schema_type = model.schema_type(self.id);
        writeln!(f, "{{")?;
        writeln!(f, "    Symbol       = {}", schema_type.symbol)?;
        if let Some(symbol) = &schema_type.override_symbol {
            writeln!(f, "    Override     = {symbol}")?;
        }
        let xml_type = model.descriptor(self.id).map_or("(null)", |d| d.name);
        writeln!(f, "    XML Type     = {xml_type}")?;
        writeln!(f, "    Element Type = {}", model.elem_type(self.id))?;
        writeln!(f, "    max value    = {}", model.max_value(self.id))?;

        if !schema_type.fields.is_empty() {
            writeln!(f, "    Fields = [")?;
            for (name, element_id) in &schema_type.fields {
                let element = model.element(*element_id);
                write!(
                    f,
                    "        Name = {name}, minOccurs = {}, maxOccurs = {}, Type = ",
                    element.min_occurs, element.max_occurs
                )?;
                match model.element_type(*element_id) {
                    Some(type_id) => write!(f, "{}", model.schema_type(type_id).symbol)?,
                    None => write!(f, "(null)")?,
                }
                if !element.default_value.is_empty() {
                    write!(f, ", Default = {}", element.default_value)?;
                }
                writeln!(f)?;
            }
            writeln!(f, "    ]")?;
        }

        if !schema_type.enumerators.is_empty() {
            writeln!(f, "    Enumerations = [")?;
            for (value, id) in &schema_type.enumerators {
                writeln!(f, "        {value} = {id}")?;
            }
            writeln!(f, "    ]")?;
        }
        write!(f, "}}")
    }
}
