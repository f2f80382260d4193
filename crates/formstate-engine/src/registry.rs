//! # Registry
//!
//! The read-only context handed to the rendering layer alongside the
//! derived trees: which renderer implements which field or widget name,
//! the root `definitions` of the current schema, and an opaque form
//! context. The engine never mutates a registry; `with_*` methods return
//! a new value.

use std::collections::BTreeMap;

use formstate_core::Schema;
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    fields: BTreeMap<String, String>,
    widgets: BTreeMap<String, String>,
    definitions: IndexMap<String, Schema>,
    form_context: Value,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a field name to the renderer that implements it.
    pub fn with_field(mut self, name: impl Into<String>, renderer: impl Into<String>) -> Self {
        self.fields.insert(name.into(), renderer.into());
        self
    }

    /// Map a widget name to the renderer that implements it.
    pub fn with_widget(mut self, name: impl Into<String>, renderer: impl Into<String>) -> Self {
        self.widgets.insert(name.into(), renderer.into());
        self
    }

    pub fn with_form_context(mut self, context: Value) -> Self {
        self.form_context = context;
        self
    }

    /// The same registry bound to another schema's definitions.
    pub fn with_definitions(mut self, definitions: IndexMap<String, Schema>) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn widget(&self, name: &str) -> Option<&str> {
        self.widgets.get(name).map(String::as_str)
    }

    pub fn definitions(&self) -> &IndexMap<String, Schema> {
        &self.definitions
    }

    pub fn form_context(&self) -> &Value {
        &self.form_context
    }
}
