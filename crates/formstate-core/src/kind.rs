//! # Value Kinds
//!
//! Classification of JSON values into the primitive kinds a schema can
//! declare. Used by the default-state synthesizer to decide whether an
//! existing value matches the schema's declared type.

use serde_json::Value;

use crate::schema::SchemaType;

/// The primitive kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    /// A number with no fractional part.
    Integer,
    /// Any other number.
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Self::Integer
                } else if n.as_f64().is_some_and(|f| f.fract() == 0.0) {
                    Self::Integer
                } else {
                    Self::Number
                }
            }
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether values of this kind satisfy the declared schema type.
    ///
    /// `number` admits integers; `integer` admits only integral numbers.
    pub fn satisfies(self, declared: SchemaType) -> bool {
        match (declared, self) {
            (SchemaType::Number, Self::Integer | Self::Number) => true,
            (SchemaType::Integer, Self::Integer) => true,
            (SchemaType::String, Self::String) => true,
            (SchemaType::Boolean, Self::Boolean) => true,
            (SchemaType::Object, Self::Object) => true,
            (SchemaType::Array, Self::Array) => true,
            (SchemaType::Null, Self::Null) => true,
            _ => false,
        }
    }

    /// True for objects and arrays.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }
}
