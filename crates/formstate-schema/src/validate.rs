//! # Validation
//!
//! The validator boundary of the form engine. A validator takes the form
//! data and a JSON Schema document (the output of
//! [`ResolvedSchema::validation_document`](crate::ResolvedSchema::validation_document))
//! and returns a flat list of violations, each addressed by a dotted data
//! path. Violations are never fatal: they are captured into the error tree
//! by the engine. Only a schema the validator cannot compile is an error.
//!
//! ## Schema Resolution
//!
//! Internal `$ref`s of the form `#/definitions/<name>` are resolved by the
//! jsonschema crate natively. Any other URI is looked up among the
//! meta-schemas registered with [`JsonSchemaValidator::with_meta_schema`];
//! unknown URIs resolve to a permissive empty schema so that validation
//! never reaches the network.
//!
//! A `$schema` declaration must name Draft 7 or a registered meta-schema.
//! Any other meta-schema is reported as a violation at `$schema` and the
//! data is not checked until that meta-schema is registered.
//!
//! ## Messages
//!
//! Messages for the common keywords use the wording form users expect
//! (`is a required property`, `should be number`, ...). A `required`
//! violation is addressed at the missing property rather than at the
//! object that declares it, so the message lands next to the empty field.

use std::collections::HashMap;
use std::fmt;

use formstate_core::{join_path, pointer_to_path, ValidatorError};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri, ValidationError, ValidationOptions};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// The meta-schema validation runs under.
const DRAFT7_META_SCHEMA: &str = "http://json-schema.org/draft-07/schema";

/// A custom string format check, registered by name.
pub type FormatCheck = fn(&str) -> bool;

/// The validator boundary.
pub trait FormValidator {
    /// Validate `data` against the schema document `schema`.
    fn validate(&self, data: &Value, schema: &Value) -> Result<ValidationReport, ValidatorError>;
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted data path of the violating node; empty for the form root.
    pub path: String,
    /// JSON Pointer into the schema document of the failing keyword.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            schema_path: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The outcome of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Alias of [`Self::is_empty`] that reads better at call sites.
    pub fn is_valid(&self) -> bool {
        self.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Resolves non-local `$ref` URIs from registered meta-schemas.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        // Registered `$id`s may or may not carry a trailing fragment marker.
        if let Some(value) = self.schemas_by_uri.get(uri_str.trim_end_matches('#')) {
            return Ok(value.clone());
        }
        debug!(uri = uri_str, "unregistered schema reference, treating as permissive");
        Ok(serde_json::json!({}))
    }
}

/// A [`FormValidator`] backed by the `jsonschema` crate (Draft 7).
///
/// The validator is compiled per call because the schema document changes
/// with the data (dependency branches, per-element array schemas).
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaValidator {
    meta_schemas: HashMap<String, Value>,
    formats: HashMap<String, FormatCheck>,
}

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional schema, addressable by its `$id` (or the
    /// Draft 4 `id`).
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError::ValidatorBuildError` if the schema has no
    /// string identifier.
    pub fn with_meta_schema(mut self, schema: Value) -> Result<Self, ValidatorError> {
        let id = schema
            .get("$id")
            .or_else(|| schema.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| ValidatorError::ValidatorBuildError {
                reason: "meta-schema has no \"$id\"".to_string(),
            })?
            .trim_end_matches('#')
            .to_string();
        self.meta_schemas.insert(id, schema);
        Ok(self)
    }

    /// Register a custom string `format`.
    pub fn with_format(mut self, name: impl Into<String>, check: FormatCheck) -> Self {
        self.formats.insert(name.into(), check);
        self
    }

    fn knows_meta_schema(&self, uri: &str) -> bool {
        let uri = uri.trim_end_matches('#');
        uri == DRAFT7_META_SCHEMA || self.meta_schemas.contains_key(uri)
    }

    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft7);
        opts.should_validate_formats(true);
        for (name, check) in &self.formats {
            opts.with_format(name.clone(), *check);
        }
        opts.with_retriever(LocalSchemaRetriever {
            schemas_by_uri: self.meta_schemas.clone(),
        });
        opts
    }

    fn check(&self, data: &Value, schema: &Value) -> Result<ValidationReport, ValidatorError> {
        let validator = self.build_options().build(schema).map_err(|e| {
            ValidatorError::ValidatorBuildError {
                reason: e.to_string(),
            }
        })?;
        let violations: Vec<Violation> = validator
            .iter_errors(data)
            .map(|e| to_violation(&e, schema))
            .collect();
        debug!(violations = violations.len(), "validated form data");
        Ok(ValidationReport::new(violations))
    }
}

impl FormValidator for JsonSchemaValidator {
    fn validate(&self, data: &Value, schema: &Value) -> Result<ValidationReport, ValidatorError> {
        let Some(meta) = schema.get("$schema").and_then(Value::as_str) else {
            return self.check(data, schema);
        };
        if !self.knows_meta_schema(meta) {
            debug!(meta_schema = meta, "unregistered meta-schema");
            return Ok(ValidationReport::new(vec![Violation {
                path: "$schema".to_string(),
                schema_path: "/$schema".to_string(),
                message: format!("no schema with key or ref \"{meta}\""),
            }]));
        }
        let mut document = schema.clone();
        if let Value::Object(map) = &mut document {
            map.remove("$schema");
        }
        self.check(data, &document)
    }
}

fn to_violation(error: &ValidationError<'_>, schema: &Value) -> Violation {
    let path = pointer_to_path(&error.instance_path.to_string());
    let schema_path = error.schema_path.to_string();
    let (path, message) = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property.as_str().map_or_else(|| property.to_string(), str::to_string);
            (join_path(&path, &name), "is a required property".to_string())
        }
        ValidationErrorKind::Type { .. } => {
            let expected = schema.pointer(&schema_path).map(|types| match types {
                Value::Array(list) => list
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.as_str().map_or_else(|| other.to_string(), str::to_string),
            });
            match expected {
                Some(expected) => (path, format!("should be {expected}")),
                None => (path, error.to_string()),
            }
        }
        ValidationErrorKind::MinLength { limit } => {
            (path, format!("should NOT be shorter than {limit} characters"))
        }
        ValidationErrorKind::MaxLength { limit } => {
            (path, format!("should NOT be longer than {limit} characters"))
        }
        ValidationErrorKind::Minimum { limit } => (path, format!("should be >= {limit}")),
        ValidationErrorKind::Maximum { limit } => (path, format!("should be <= {limit}")),
        ValidationErrorKind::MinItems { limit } => {
            (path, format!("should NOT have fewer than {limit} items"))
        }
        ValidationErrorKind::MaxItems { limit } => {
            (path, format!("should NOT have more than {limit} items"))
        }
        ValidationErrorKind::Enum { .. } => {
            (path, "should be equal to one of the allowed values".to_string())
        }
        ValidationErrorKind::Pattern { pattern } => {
            (path, format!("should match pattern \"{pattern}\""))
        }
        ValidationErrorKind::Format { format } => {
            (path, format!("should match format \"{format}\""))
        }
        _ => (path, error.to_string()),
    };
    Violation {
        path,
        schema_path,
        message,
    }
}
