//! # State Subcommand
//!
//! Computes the full form state for a schema and optional data, and
//! prints it as JSON: the resolved schema, the settled form data, the id
//! and path trees, and any errors.

use std::io::Write;

use anyhow::Context;
use clap::Args;

use crate::input::FormArgs;

/// Arguments for the state subcommand.
#[derive(Args, Debug)]
pub struct StateArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Print only the settled form data.
    #[arg(long)]
    pub data_only: bool,
}

pub fn run(args: &StateArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let engine = args.form.load()?.into_engine()?;
    let state = engine.state().context("engine produced no state")?;
    let document = if args.data_only {
        serde_json::to_value(&state.form_data)?
    } else {
        state.to_json()?
    };
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    tracing::debug!(errors = state.errors.len(), "printed form state");
    Ok(())
}
