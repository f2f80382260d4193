//! # Schema Data Model
//!
//! A `Schema` is one node of a declarative JSON-Schema-style document.
//! Only the keywords the engine interprets are modelled as fields;
//! everything else (`title`, `minLength`, `format`, ...) is preserved in
//! [`Schema::keywords`] and handed to the validator untouched.
//!
//! ## Keywords
//!
//! | Keyword        | Field            | Meaning to the engine                        |
//! |----------------|------------------|----------------------------------------------|
//! | `type`         | `types`          | Declared kind(s) of the value                |
//! | `properties`   | `properties`     | Child schemas, in declared order             |
//! | `items`        | `items`          | Blueprint for every array element            |
//! | `required`     | `required`       | Property names that must be present          |
//! | `enum`         | `enum_values`    | Allowed values                               |
//! | `default`      | `default`        | Value synthesized when data is absent        |
//! | `$ref`         | `reference`      | Pointer into the root `definitions`          |
//! | `definitions`  | `definitions`    | Named schemas, meaningful at the root        |
//! | `dependencies` | `dependencies`   | Conditional requirements or sub-schemas      |
//! | `oneOf`        | `one_of`         | Candidate branches (inside a dependency)     |

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A primitive type name usable in the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl SchemaType {
    /// The keyword spelling of this type (e.g., `"number"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a `type` keyword: one type or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    One(SchemaType),
    Many(Vec<SchemaType>),
}

impl TypeDecl {
    /// The type that shapes the value: the first non-`null` alternative,
    /// or `null` when that is the only one.
    pub fn primary(&self) -> Option<SchemaType> {
        match self {
            Self::One(t) => Some(*t),
            Self::Many(ts) => ts
                .iter()
                .copied()
                .find(|t| *t != SchemaType::Null)
                .or_else(|| ts.first().copied()),
        }
    }

    /// All declared alternatives.
    pub fn types(&self) -> Vec<SchemaType> {
        match self {
            Self::One(t) => vec![*t],
            Self::Many(ts) => ts.clone(),
        }
    }

    /// Whether a value is acceptable under any declared alternative.
    pub fn admits(&self, value: &Value) -> bool {
        let kind = crate::ValueKind::of(value);
        self.types().into_iter().any(|t| kind.satisfies(t))
    }
}

/// One entry of a `dependencies` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    /// Property dependency: when the key is present, these properties
    /// become required too.
    Properties(Vec<String>),
    /// Schema dependency: when the key is present, this schema is merged
    /// into the node. With `oneOf`, one branch is selected by the key's value.
    Schema(Box<Schema>),
}

/// One node of a declarative schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TypeDecl>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, Dependency>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,

    /// Every keyword the engine does not interpret.
    #[serde(flatten)]
    pub keywords: Map<String, Value>,
}

impl Schema {
    /// Parse a schema document from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Serialize this node (and its subtree) back into a JSON value.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// The type that shapes values of this node.
    ///
    /// Falls back to `object` when `properties` are declared and to `array`
    /// when `items` is, so that untyped container schemas still nest.
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

    /// A pass-through keyword by name.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }
}
