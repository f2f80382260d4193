//! # Submit Subcommand
//!
//! Loads a form, submits its data and reports the outcome. Exits with a
//! failure status when validation rejects the data.

use std::io::Write;

use clap::Args;
use formstate_engine::SubmitOutcome;
use serde_json::json;

use crate::input::FormArgs;

/// Arguments for the submit subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub form: FormArgs,
}

/// Returns whether the data was accepted.
pub fn run(args: &SubmitArgs, out: &mut impl Write) -> anyhow::Result<bool> {
    let mut engine = args.form.load()?.into_engine()?;
    let (report, accepted) = match engine.on_submit(None)? {
        SubmitOutcome::Submitted(data) => {
            tracing::info!("form submitted");
            (json!({"status": "submitted", "formData": data}), true)
        }
        SubmitOutcome::Rejected(errors) => {
            for error in &errors {
                tracing::warn!(path = %error.path, "{}", error.message);
            }
            (json!({"status": "rejected", "errors": errors}), false)
        }
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(accepted)
}
