//! # formstate-engine: The Form-State Engine
//!
//! Drives a form from a declarative schema. Every external change runs
//! Schema Resolver → Default-State Synthesizer → Address-Tree Builder and,
//! when validating, the Error Contextualizer; the Update Gate then decides
//! whether the result reaches the rendering layer.
//!
//! ## Modules
//!
//! - [`engine`]: [`FormEngine`] and its entry points
//!   (`on_external_change`, `on_field_change`, `on_blur`, `on_focus`,
//!   `on_submit`, `on_add_item`), the [`FormListener`] notification trait
//!   and the [`CustomValidation`] hook.
//! - [`error_schema`]: the Error Contextualizer.
//! - [`extract`]: the Field-Selection Extractor used by `omit_extra_data`.
//! - [`gate`]: the Update Gate.
//! - [`config`]: [`FormConfig`], loadable from YAML or JSON.
//! - [`registry`]: the read-only [`Registry`] threaded to the renderer.
//!
//! ## Example
//!
//! ```
//! use formstate_core::Schema;
//! use formstate_engine::{FormConfig, FormEngine};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string", "default": "anonymous"}}
//! })).unwrap();
//!
//! let mut engine = FormEngine::new(FormConfig::default());
//! let state = engine.on_external_change(schema, json!({}), None).unwrap();
//! assert_eq!(state.form_data, Some(json!({"name": "anonymous"})));
//! assert_eq!(state.id_schema.get("name").unwrap().id, "root_name");
//! ```

pub mod config;
pub mod engine;
pub mod error_schema;
pub mod extract;
pub mod gate;
pub mod registry;
pub mod state;

pub use config::{ConfigError, FormConfig};
pub use engine::{CustomValidation, FormEngine, FormListener, SubmitOutcome};
pub use error_schema::{contextualize, to_error_list, ErrorEntry, ErrorSchema};
pub use extract::{field_names, leaf_paths, used_form_data};
pub use gate::should_notify;
pub use registry::Registry;
pub use state::FormState;
