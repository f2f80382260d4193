//! # formstate-cli: Form-State Command-Line Interface
//!
//! Runs the form engine over schema and data documents on disk.
//!
//! ## Subcommands
//!
//! - `state`: Compute and print the full form state
//! - `submit`: Validate and submit form data
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from form logic.
//! - Handler functions delegate to `formstate-engine`.

pub mod input;
pub mod state;
pub mod submit;
