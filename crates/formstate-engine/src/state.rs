//! # Form State
//!
//! The tuple handed to the rendering layer after every recomputation.

use formstate_core::Schema;
use formstate_schema::{IdSchema, PathSchema, ResolvedSchema};
use serde_json::{json, Value};

use crate::error_schema::{ErrorEntry, ErrorSchema};

/// Everything the rendering layer needs to draw the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// The schema as supplied by the caller.
    pub schema: Schema,
    /// The schema resolved against `form_data`.
    pub resolved: ResolvedSchema,
    /// Rendering hints (`ui:*` keys), passed through untouched.
    pub ui: Value,
    pub form_data: Option<Value>,
    pub id_schema: IdSchema,
    pub path_schema: PathSchema,
    pub error_schema: ErrorSchema,
    pub errors: Vec<ErrorEntry>,
    /// Whether the caller supplied data (as opposed to starting blank).
    pub edit: bool,
}

impl FormState {
    /// Render the state as a JSON document.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        Ok(json!({
            "schema": self.resolved.document()?,
            "uiSchema": self.ui,
            "formData": self.form_data,
            "idSchema": serde_json::to_value(&self.id_schema)?,
            "pathSchema": serde_json::to_value(&self.path_schema)?,
            "errorSchema": serde_json::to_value(&self.error_schema)?,
            "errors": serde_json::to_value(&self.errors)?,
            "edit": self.edit,
        }))
    }
}
