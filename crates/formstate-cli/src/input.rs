//! # Shared Inputs
//!
//! The form arguments common to every subcommand, and loading of schema,
//! ui-hint and data documents. Files ending in `.json` are parsed as JSON;
//! anything else is parsed as YAML.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use formstate_core::Schema;
use formstate_engine::{FormConfig, FormEngine};
use serde_json::Value;

/// Arguments describing one form.
#[derive(Args, Debug, Clone)]
pub struct FormArgs {
    /// Schema document (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Form data document. Omit to start from schema defaults.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Rendering hints document (`ui:*` keys).
    #[arg(long)]
    pub ui: Option<PathBuf>,

    /// Engine configuration document.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Validate on every change.
    #[arg(long)]
    pub live_validate: bool,

    /// Drop values no schema field addresses.
    #[arg(long)]
    pub omit_extra_data: bool,

    /// Skip validation entirely.
    #[arg(long)]
    pub no_validate: bool,

    /// Override the root id prefix.
    #[arg(long)]
    pub id_prefix: Option<String>,

    /// Override the id separator.
    #[arg(long)]
    pub id_separator: Option<String>,
}

/// A form loaded from disk, ready to feed into the engine.
#[derive(Debug)]
pub struct LoadedForm {
    pub config: FormConfig,
    pub schema: Schema,
    pub ui: Value,
    pub data: Option<Value>,
}

impl FormArgs {
    /// The configuration file (if any) with command-line flags applied on top.
    pub fn config(&self) -> anyhow::Result<FormConfig> {
        let mut config = match &self.config {
            Some(path) => FormConfig::from_path(path)?,
            None => FormConfig::default(),
        };
        config.live_validate |= self.live_validate;
        config.omit_extra_data |= self.omit_extra_data;
        config.no_validate |= self.no_validate;
        if let Some(prefix) = &self.id_prefix {
            config.id_prefix = prefix.clone();
        }
        if let Some(separator) = &self.id_separator {
            config.id_separator = separator.clone();
        }
        Ok(config)
    }

    pub fn load(&self) -> anyhow::Result<LoadedForm> {
        let schema_doc = load_document(&self.schema)?;
        let schema = Schema::from_value(schema_doc)
            .with_context(|| format!("'{}' is not a valid schema", self.schema.display()))?;
        let ui = match &self.ui {
            Some(path) => load_document(path)?,
            None => Value::Object(Default::default()),
        };
        let data = self.data.as_deref().map(load_document).transpose()?;
        Ok(LoadedForm {
            config: self.config()?,
            schema,
            ui,
            data,
        })
    }
}

impl LoadedForm {
    /// Build an engine and run the initial external change.
    pub fn into_engine(self) -> anyhow::Result<FormEngine> {
        let mut engine = FormEngine::new(self.config);
        engine
            .on_external_change(self.schema, self.ui, self.data)
            .context("computing form state")?;
        Ok(engine)
    }
}

/// Load a JSON or YAML document.
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let value = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in '{}'", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in '{}'", path.display()))?
    };
    Ok(value)
}
