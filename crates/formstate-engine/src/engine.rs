//! # Form Engine
//!
//! The entry points of the form-state engine. Each call runs to
//! completion: it resolves the schema against the data, synthesizes
//! defaults where the entry point calls for it, rebuilds the address
//! trees, optionally validates, and hands the resulting [`FormState`] to
//! the [`FormListener`].
//!
//! ## Notifications
//!
//! - `on_update` fires when the [update gate](crate::gate) lets a state
//!   through, i.e. when it differs observably from the previous one.
//! - `on_change` fires after every field change, and after an external
//!   change only when default synthesis altered the caller's data and the
//!   result is also new relative to the previous state. A caller that
//!   feeds `on_change` back into `on_external_change` therefore sees the
//!   synthesized defaults echoed exactly once.
//! - `on_submit` and `on_error` are mutually exclusive outcomes of
//!   `on_submit`.
//!
//! All entry points take `&mut self`; a listener cannot call back into
//! the engine while it is being notified.

use formstate_core::{path_to_pointer, parse_path, EngineError, FormError, Schema, ValidatorError};
use formstate_schema::{
    build_id_schema, build_path_schema, default_form_state, fresh_item, resolve, FormValidator,
    JsonSchemaValidator, ResolvedSchema, Resolver, Violation,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::FormConfig;
use crate::error_schema::{contextualize, to_error_list, ErrorEntry, ErrorSchema};
use crate::extract::{field_names, used_form_data};
use crate::gate::should_notify;
use crate::registry::Registry;
use crate::state::FormState;

/// Upper bound on resolve → synthesize rounds for one change.
const MAX_SETTLE_PASSES: usize = 4;

/// UI hint that overrides the id of the root node.
const ROOT_FIELD_ID: &str = "ui:rootFieldId";

/// Receives the engine's notifications. Every method defaults to a no-op.
pub trait FormListener {
    fn on_update(&mut self, _state: &FormState) {}
    fn on_change(&mut self, _state: &FormState) {}
    fn on_submit(&mut self, _state: &FormState) {}
    fn on_error(&mut self, _errors: &[ErrorEntry]) {}
    fn on_blur(&mut self, _id: &str, _value: &Value) {}
    fn on_focus(&mut self, _id: &str, _value: &Value) {}
}

struct NoopListener;

impl FormListener for NoopListener {}

/// Application-level validation run after schema validation.
///
/// Errors added to `errors` are merged into the contextualized tree.
pub trait CustomValidation {
    fn validate(&self, data: &Value, errors: &mut ErrorSchema);
}

impl<F> CustomValidation for F
where
    F: Fn(&Value, &mut ErrorSchema),
{
    fn validate(&self, data: &Value, errors: &mut ErrorSchema) {
        self(data, errors)
    }
}

type TransformErrors = Box<dyn Fn(Vec<Violation>) -> Vec<Violation>>;

/// Result of [`FormEngine::on_submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The data passed validation (or validation is disabled).
    Submitted(Option<Value>),
    /// Validation failed; the listener's `on_error` was called.
    Rejected(Vec<ErrorEntry>),
}

/// The form-state engine.
pub struct FormEngine<V: FormValidator = JsonSchemaValidator> {
    config: FormConfig,
    validator: V,
    listener: Box<dyn FormListener>,
    custom_validation: Option<Box<dyn CustomValidation>>,
    transform_errors: Option<TransformErrors>,
    registry: Registry,
    state: Option<FormState>,
}

impl FormEngine {
    /// An engine validating with [`JsonSchemaValidator`].
    pub fn new(config: FormConfig) -> Self {
        Self::with_validator(config, JsonSchemaValidator::new())
    }
}

impl<V: FormValidator> FormEngine<V> {
    pub fn with_validator(config: FormConfig, validator: V) -> Self {
        Self {
            config,
            validator,
            listener: Box::new(NoopListener),
            custom_validation: None,
            transform_errors: None,
            registry: Registry::new(),
            state: None,
        }
    }

    pub fn with_listener(mut self, listener: impl FormListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn with_custom_validation(mut self, hook: impl CustomValidation + 'static) -> Self {
        self.custom_validation = Some(Box::new(hook));
        self
    }

    /// Rewrite the validator's violations before they are contextualized.
    pub fn with_transform_errors(
        mut self,
        transform: impl Fn(Vec<Violation>) -> Vec<Violation> + 'static,
    ) -> Self {
        self.transform_errors = Some(Box::new(transform));
        self
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The most recently computed state, if any.
    pub fn state(&self) -> Option<&FormState> {
        self.state.as_ref()
    }

    /// The registry bound to the current schema's definitions.
    pub fn registry(&self) -> Registry {
        let definitions = self
            .state
            .as_ref()
            .map(|state| state.schema.definitions.clone())
            .unwrap_or_default();
        self.registry.clone().with_definitions(definitions)
    }

    // ─── Entry points ───────────────────────────────────────────────

    /// A new schema, new rendering hints or new data from outside the form.
    ///
    /// Absent data is filled from schema defaults. Validation runs only
    /// when data was supplied and live validation is on; otherwise the
    /// previous errors are carried over.
    pub fn on_external_change(
        &mut self,
        schema: Schema,
        ui: Value,
        data: Option<Value>,
    ) -> Result<&FormState, FormError> {
        let edit = data.is_some();
        let (resolved, form_data) = self.settle(&schema, data.as_ref())?;
        let errors = if edit && !self.config.no_validate && self.config.live_validate {
            self.validate(&schema, form_data.as_ref())?
        } else {
            self.previous_errors()
        };

        let echo = form_data != data
            && self
                .state
                .as_ref()
                .map_or(true, |prev| prev.form_data != form_data);
        let next = self.assemble(schema, resolved, ui, form_data, edit, errors);
        Ok(self.commit(next, echo))
    }

    /// The rendering layer changed the data.
    ///
    /// Defaults are synthesized for whatever the change left absent, such
    /// as the properties of a newly selected dependency branch; values the
    /// user cleared stay cleared. `error_override` replaces the error tree
    /// when live validation is off.
    pub fn on_field_change(
        &mut self,
        data: Option<Value>,
        error_override: Option<ErrorSchema>,
    ) -> Result<&FormState, FormError> {
        let prev = self.state.as_ref().ok_or(EngineError::NotInitialised)?;
        let schema = prev.schema.clone();
        let ui = prev.ui.clone();
        let edit = prev.edit;

        let (mut resolved, mut data) = self.settle(&schema, data.as_ref())?;
        if self.config.omit_extra_data && self.config.live_validate {
            if let Some(value) = data.take() {
                let names = field_names(&build_path_schema(&resolved, ""), &value);
                let pruned = used_form_data(&value, &names);
                resolved = resolve(&schema, &schema.definitions, Some(&pruned))?;
                data = Some(pruned);
            }
        }

        let errors = if !self.config.no_validate && self.config.live_validate {
            self.validate(&schema, data.as_ref())?
        } else {
            match error_override {
                Some(override_schema) if !self.config.no_validate => {
                    let list = to_error_list(&override_schema);
                    (override_schema, list)
                }
                _ => self.previous_errors(),
            }
        };

        let next = self.assemble(schema, resolved, ui, data, edit, errors);
        Ok(self.commit(next, true))
    }

    pub fn on_blur(&mut self, id: &str, value: &Value) {
        self.listener.on_blur(id, value);
    }

    pub fn on_focus(&mut self, id: &str, value: &Value) {
        self.listener.on_focus(id, value);
    }

    /// Submit `data`, or the current form data when `None`.
    ///
    /// On violations the error tree is updated, `on_error` fires and the
    /// form data is left as it was. Otherwise the (possibly pruned) data
    /// becomes the form data, errors are cleared and `on_submit` fires.
    pub fn on_submit(&mut self, data: Option<Value>) -> Result<SubmitOutcome, FormError> {
        let prev = self.state.as_ref().ok_or(EngineError::NotInitialised)?;
        let schema = prev.schema.clone();
        let ui = prev.ui.clone();
        let edit = prev.edit;
        let form_data = data.or_else(|| prev.form_data.clone());

        let submitted = match &form_data {
            Some(value) if self.config.omit_extra_data => {
                let resolved = resolve(&schema, &schema.definitions, Some(value))?;
                let names = field_names(&build_path_schema(&resolved, ""), value);
                Some(used_form_data(value, &names))
            }
            other => other.clone(),
        };

        if !self.config.no_validate {
            let (error_schema, errors) = self.validate(&schema, submitted.as_ref())?;
            if !errors.is_empty() {
                debug!(errors = errors.len(), "submit rejected");
                let resolved = resolve(&schema, &schema.definitions, form_data.as_ref())?;
                let next =
                    self.assemble(schema, resolved, ui, form_data, edit, (error_schema, errors.clone()));
                self.commit(next, false);
                self.listener.on_error(&errors);
                return Ok(SubmitOutcome::Rejected(errors));
            }
        }

        let resolved = resolve(&schema, &schema.definitions, submitted.as_ref())?;
        let next = self.assemble(schema, resolved, ui, submitted.clone(), edit, Default::default());
        self.commit(next, false);
        if let Some(state) = &self.state {
            self.listener.on_submit(state);
        }
        Ok(SubmitOutcome::Submitted(submitted))
    }

    /// Append a new element, synthesized from the item schema, to the
    /// array at `path`.
    pub fn on_add_item(&mut self, path: &str) -> Result<&FormState, FormError> {
        let prev = self.state.as_ref().ok_or(EngineError::NotInitialised)?;
        let node = node_at(&prev.resolved, path).ok_or_else(|| EngineError::InvalidPath {
            path: path.to_string(),
            reason: "no schema node at this path".to_string(),
        })?;
        let blueprint = node.items.as_deref().ok_or_else(|| EngineError::NotAnArray {
            path: path.to_string(),
        })?;
        let item = fresh_item(blueprint, &prev.schema.definitions)?.unwrap_or(Value::Null);

        let mut data = prev.form_data.clone().ok_or_else(|| EngineError::InvalidPath {
            path: path.to_string(),
            reason: "the form has no data".to_string(),
        })?;
        match data.pointer_mut(&path_to_pointer(path)) {
            Some(Value::Array(items)) => items.push(item),
            Some(_) => {
                return Err(EngineError::NotAnArray {
                    path: path.to_string(),
                }
                .into())
            }
            None => {
                return Err(EngineError::InvalidPath {
                    path: path.to_string(),
                    reason: "no value at this path".to_string(),
                }
                .into())
            }
        }
        self.on_field_change(Some(data), None)
    }

    // ─── Internals ──────────────────────────────────────────────────

    /// Alternate resolution and default filling until the data stops
    /// changing. Synthesized values can select new dependency branches,
    /// whose defaults then need synthesizing in turn.
    fn settle(
        &self,
        schema: &Schema,
        data: Option<&Value>,
    ) -> Result<(ResolvedSchema, Option<Value>), FormError> {
        let resolver = Resolver::new(&schema.definitions);
        let mut current = data.cloned();
        for pass in 1..=MAX_SETTLE_PASSES {
            let resolved = resolver.resolve(schema, current.as_ref())?;
            let next = default_form_state(&resolved, current.as_ref());
            if next == current {
                debug!(pass, "form data settled");
                return Ok((resolved, next));
            }
            current = next;
        }
        warn!(
            passes = MAX_SETTLE_PASSES,
            "default synthesis did not settle; keeping the last pass"
        );
        let resolved = resolver.resolve(schema, current.as_ref())?;
        Ok((resolved, current))
    }

    fn validate(
        &self,
        schema: &Schema,
        data: Option<&Value>,
    ) -> Result<(ErrorSchema, Vec<ErrorEntry>), FormError> {
        let Some(data) = data else {
            return Ok(Default::default());
        };
        let resolved = resolve(schema, &schema.definitions, Some(data))?;
        let document = resolved
            .validation_document(&schema.definitions)
            .map_err(ValidatorError::from)?;
        let mut violations = self.validator.validate(data, &document)?.into_inner();
        if let Some(transform) = &self.transform_errors {
            violations = transform(violations);
        }

        let mut error_schema = contextualize(&violations);
        if let Some(hook) = &self.custom_validation {
            let mut custom = ErrorSchema::default();
            hook.validate(data, &mut custom);
            error_schema.merge(custom);
        }
        let errors = to_error_list(&error_schema);
        debug!(errors = errors.len(), "validated form data");
        Ok((error_schema, errors))
    }

    fn previous_errors(&self) -> (ErrorSchema, Vec<ErrorEntry>) {
        self.state
            .as_ref()
            .map(|state| (state.error_schema.clone(), state.errors.clone()))
            .unwrap_or_default()
    }

    fn assemble(
        &self,
        schema: Schema,
        resolved: ResolvedSchema,
        ui: Value,
        form_data: Option<Value>,
        edit: bool,
        (error_schema, errors): (ErrorSchema, Vec<ErrorEntry>),
    ) -> FormState {
        let root_id = ui
            .get(ROOT_FIELD_ID)
            .and_then(Value::as_str)
            .unwrap_or(self.config.id_prefix.as_str());
        let id_schema = build_id_schema(&resolved, root_id, &self.config.id_separator);
        let path_schema = build_path_schema(&resolved, "");
        FormState {
            id_schema,
            path_schema,
            schema,
            resolved,
            ui,
            form_data,
            error_schema,
            errors,
            edit,
        }
    }

    /// Store `next` and notify the listener.
    fn commit(&mut self, next: FormState, echo: bool) -> &FormState {
        let notify = should_notify(self.state.as_ref(), &next);
        let state = self.state.insert(next);
        if notify {
            self.listener.on_update(state);
        }
        if echo {
            self.listener.on_change(state);
        }
        state
    }
}

/// The resolved node addressed by a dotted path.
fn node_at<'a>(root: &'a ResolvedSchema, path: &str) -> Option<&'a ResolvedSchema> {
    parse_path(path).iter().try_fold(root, |node, segment| {
        node.property(segment).or_else(|| {
            segment
                .parse::<usize>()
                .ok()
                .and_then(|index| node.elements.get(index))
        })
    })
}
