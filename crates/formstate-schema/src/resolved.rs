//! # Resolved Schemas
//!
//! The output of [`crate::resolve`]: a schema tree with every `$ref`
//! dereferenced and every applicable `dependencies` branch merged in.
//!
//! Two parts of the tree are intentionally left unresolved, and the types
//! make that explicit rather than leaving `$ref` strings in resolved nodes:
//!
//! - [`SchemaSlot::Deferred`] holds a property whose schema points at a
//!   recursive definition and which has no data behind it. Expanding it
//!   would never terminate; it is expanded once data appears.
//! - [`ResolvedSchema::items`] is the raw item blueprint. Each element of
//!   the data array gets its own resolved schema in
//!   [`ResolvedSchema::elements`], because `dependencies` inside items may
//!   select a different branch per element.
//!
//! A `$ref` to a document outside the schema (an absolute URI) is kept in
//! [`ResolvedSchema::reference`] and resolved by the validator.

use formstate_core::{Schema, SchemaType, TypeDecl};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A property slot in a resolved object schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSlot {
    /// Fully resolved against the data at this property.
    Resolved(ResolvedSchema),
    /// Recursive reference with no data behind it; kept verbatim.
    Deferred(Schema),
}

impl SchemaSlot {
    /// The resolved schema, if this slot was expanded.
    pub fn resolved(&self) -> Option<&ResolvedSchema> {
        match self {
            Self::Resolved(schema) => Some(schema),
            Self::Deferred(_) => None,
        }
    }
}

/// A schema node with references and dependencies resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSchema {
    /// External reference, resolved by the validator's retriever.
    pub reference: Option<String>,
    pub types: Option<TypeDecl>,
    pub properties: IndexMap<String, SchemaSlot>,
    pub required: Vec<String>,
    /// Raw item blueprint, used for validation of empty arrays and to
    /// synthesize newly added items.
    pub items: Option<Box<Schema>>,
    /// One resolved schema per element of the data array.
    pub elements: Vec<ResolvedSchema>,
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
    /// Passed through to the validator unresolved.
    pub one_of: Vec<Schema>,
    pub keywords: Map<String, Value>,
}

impl ResolvedSchema {
    /// The type that shapes values of this node (see [`Schema::primary_type`]).
    pub fn primary_type(&self) -> Option<SchemaType> {
        self.types.as_ref().and_then(TypeDecl::primary).or_else(|| {
            if !self.properties.is_empty() {
                Some(SchemaType::Object)
            } else if self.items.is_some() {
                Some(SchemaType::Array)
            } else {
                None
            }
        })
    }

    /// The resolved schema of a property, if it was expanded.
    pub fn property(&self, key: &str) -> Option<&ResolvedSchema> {
        self.properties.get(key).and_then(SchemaSlot::resolved)
    }

    /// Whether the node declares `key` as required.
    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|r| r == key)
    }

    /// Convert back into a plain schema.
    ///
    /// The result contains no `dependencies` (they were consumed) and no
    /// per-element schemas (they are recomputed from data). Resolving it
    /// again against the same data yields `self`.
    pub fn to_schema(&self) -> Schema {
        Schema {
            reference: self.reference.clone(),
            types: self.types.clone(),
            properties: self
                .properties
                .iter()
                .map(|(key, slot)| {
                    let schema = match slot {
                        SchemaSlot::Resolved(resolved) => resolved.to_schema(),
                        SchemaSlot::Deferred(raw) => raw.clone(),
                    };
                    (key.clone(), schema)
                })
                .collect(),
            items: self.items.clone(),
            required: self.required.clone(),
            enum_values: self.enum_values.clone(),
            default: self.default.clone(),
            definitions: IndexMap::new(),
            dependencies: IndexMap::new(),
            one_of: self.one_of.clone(),
            keywords: self.keywords.clone(),
        }
    }

    /// Render this node as a JSON Schema document for the validator.
    ///
    /// Arrays with data are emitted in tuple form (`items: [...]`) so that
    /// each element is checked against the branch selected for it.
    pub fn document(&self) -> Result<Value, serde_json::Error> {
        let mut doc = self.keywords.clone();
        if let Some(reference) = &self.reference {
            doc.insert("$ref".into(), Value::String(reference.clone()));
        }
        if let Some(types) = &self.types {
            doc.insert("type".into(), serde_json::to_value(types)?);
        }
        if !self.properties.is_empty() {
            let mut properties = Map::new();
            for (key, slot) in &self.properties {
                let value = match slot {
                    SchemaSlot::Resolved(resolved) => resolved.document()?,
                    SchemaSlot::Deferred(raw) => raw.to_value()?,
                };
                properties.insert(key.clone(), value);
            }
            doc.insert("properties".into(), Value::Object(properties));
        }
        if !self.required.is_empty() {
            doc.insert("required".into(), serde_json::to_value(&self.required)?);
        }
        if !self.elements.is_empty() {
            let elements = self
                .elements
                .iter()
                .map(ResolvedSchema::document)
                .collect::<Result<Vec<_>, _>>()?;
            doc.insert("items".into(), Value::Array(elements));
        } else if let Some(items) = &self.items {
            doc.insert("items".into(), items.to_value()?);
        }
        if let Some(values) = &self.enum_values {
            doc.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(default) = &self.default {
            doc.insert("default".into(), default.clone());
        }
        if !self.one_of.is_empty() {
            doc.insert("oneOf".into(), serde_json::to_value(&self.one_of)?);
        }
        Ok(Value::Object(doc))
    }

    /// The validator's view of the whole form: [`Self::document`] with the
    /// root `definitions` attached so that deferred references still resolve.
    pub fn validation_document(
        &self,
        definitions: &IndexMap<String, Schema>,
    ) -> Result<Value, serde_json::Error> {
        let mut doc = self.document()?;
        if !definitions.is_empty() {
            if let Value::Object(map) = &mut doc {
                map.insert("definitions".into(), serde_json::to_value(definitions)?);
            }
        }
        Ok(doc)
    }
}
