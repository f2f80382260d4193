//! # formstate-schema: Resolution, Defaults, Addressing & Validation
//!
//! The schema-side half of the form-state engine. Given a declarative
//! schema and the current form data it computes everything the rendering
//! layer needs that depends only on (schema, data).
//!
//! ## Schema Resolution (`resolve`)
//!
//! [`resolve`] dereferences `$ref` pointers into the root `definitions`,
//! merges local keywords over the referenced target, and merges the
//! `dependencies` branch selected by the current data. Recursive
//! definitions are only expanded as deep as the data actually nests; the
//! unexpanded remainder is kept as [`SchemaSlot::Deferred`].
//!
//! ## Default-State Synthesis (`defaults`)
//!
//! [`synthesize`] reconciles existing data against a resolved schema,
//! filling absent values from declared defaults while preserving values
//! the user explicitly cleared. [`default_form_state`] lays the caller's
//! own values back over that result and is what the engine stores.
//!
//! ## Address Trees (`address`)
//!
//! [`build_id_schema`] and [`build_path_schema`] derive the stable
//! identifier and dotted-path trees for every addressable node.
//!
//! ## Validation (`validate`)
//!
//! [`FormValidator`] is the validator boundary. [`JsonSchemaValidator`]
//! implements it with the `jsonschema` crate (Draft 7), resolving extra
//! meta-schemas locally and never touching the network.

pub mod address;
pub mod defaults;
pub mod resolve;
pub mod resolved;
pub mod validate;

pub use address::{build_id_schema, build_path_schema, IdSchema, PathSchema};
pub use defaults::{default_form_state, fresh_item, synthesize};
pub use resolve::{merge_schemas, resolve, Resolver};
pub use resolved::{ResolvedSchema, SchemaSlot};
pub use validate::{FormValidator, JsonSchemaValidator, ValidationReport, Violation};
