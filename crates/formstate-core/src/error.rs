//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout the formstate workspace. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Propagation
//!
//! - Schema-shape errors (`ResolveError`) stop the current computation and
//!   are returned to the caller. A malformed schema cannot produce a
//!   trustworthy address tree.
//! - Data-content errors are never represented here. Validation violations
//!   are ordinary data captured into the error schema; the form stays
//!   interactive while invalid.
//! - Malformed dependency branches are logged and degrade to "no branch
//!   selected"; they have no error variant.

use thiserror::Error;

/// Top-level error type for the form-state engine.
#[derive(Error, Debug)]
pub enum FormError {
    /// Schema resolution failed.
    #[error("schema resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// The validator could not be built or run.
    #[error("validator error: {0}")]
    Validator(#[from] ValidatorError),

    /// An engine entry point was called in an invalid state.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// A schema or data document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error raised while dereferencing `$ref` pointers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A `$ref` names a definition (or a path inside one) that does not exist.
    #[error("could not find a definition for {reference}")]
    BrokenReference {
        /// The reference string exactly as written in the schema.
        reference: String,
    },

    /// A chain of references points back at itself without any
    /// intervening structure, so it can never be dereferenced.
    #[error("circular reference chain: {}", chain.join(" -> "))]
    CircularReference {
        /// References visited, in order, ending with the repeated one.
        chain: Vec<String>,
    },

    /// The reference is not a local `#/definitions/...` pointer.
    #[error("unsupported reference '{reference}': {reason}")]
    InvalidPointer {
        /// The reference string exactly as written in the schema.
        reference: String,
        /// Why the pointer was rejected.
        reason: String,
    },
}

/// Error raised by the validator boundary.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error: {reason}")]
    ValidatorBuildError {
        /// Reason the validator could not be built.
        reason: String,
    },

    /// The resolved schema could not be serialized for validation.
    #[error("schema serialization failed: {0}")]
    SchemaSerialization(#[from] serde_json::Error),
}

/// Error raised by engine entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An entry point that needs a schema ran before the first
    /// `on_external_change`.
    #[error("form engine has no schema yet; call on_external_change first")]
    NotInitialised,

    /// `on_add_item` addressed a value that is not an array.
    #[error("value at '{path}' is not an array")]
    NotAnArray {
        /// Dotted path that was addressed.
        path: String,
    },

    /// A dotted path could not be applied to the current data.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// Dotted path that was addressed.
        path: String,
        /// Why the path could not be applied.
        reason: String,
    },
}
