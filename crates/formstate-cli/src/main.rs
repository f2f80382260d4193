//! # formstate CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// Schema-driven form-state engine.
///
/// Resolves a form schema against data, fills defaults, derives the id and
/// path trees, and validates or submits the data.
#[derive(Parser, Debug)]
#[command(name = "formstate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Compute and print the form state.
    State(formstate_cli::state::StateArgs),
    /// Validate and submit form data.
    Submit(formstate_cli::submit::SubmitArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::State(args) => {
            formstate_cli::state::run(&args, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Submit(args) => {
            let accepted = formstate_cli::submit::run(&args, &mut stdout)?;
            Ok(if accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
