//! # formstate-core: Foundational Types for the Form-State Engine
//!
//! This crate is the leaf of the formstate workspace. It defines the
//! declarative schema model that every other crate walks, the value-kind
//! classification used to reconcile data against declared types, the
//! dotted-path conventions shared by the address trees and the error
//! contextualizer, and the structured error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **Typed schema nodes.** `Schema` models the keywords the engine
//!    interprets (`type`, `properties`, `items`, `required`, `enum`,
//!    `default`, `$ref`, `definitions`, `dependencies`, `oneOf`) and keeps
//!    every other keyword verbatim in a pass-through map for the validator.
//!
//! 2. **Absent is not null.** Form data is `Option<serde_json::Value>`.
//!    `None` means the value was never set; `Some(Value::Null)` means the
//!    user cleared it. Defaults are only ever applied to the former.
//!
//! 3. **One path convention.** Dotted paths (`list.0.title`) are the only
//!    data addresses exchanged between components. JSON pointers coming
//!    from the validator are converted at the boundary.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formstate-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod kind;
pub mod path;
pub mod schema;

pub use error::{EngineError, FormError, ResolveError, ValidatorError};
pub use kind::ValueKind;
pub use path::{join_path, parse_path, path_to_pointer, pointer_to_path, value_at};
pub use schema::{Dependency, Schema, SchemaType, TypeDecl};
