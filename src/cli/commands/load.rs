//! Implementation of the `trainconf load` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::TrainingConfig;
use crate::infrastructure::config::{validation, ConfigLoader, LoadOptions, Override};

/// Prefix of environment variables read as overrides.
pub const ENV_PREFIX: &str = "TRAINCONF_";

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Path to the YAML configuration document
    pub path: PathBuf,

    /// Override a value by key path (repeatable), e.g. --set optim.lr=1e-4;
    /// use `null` to reset a field to its default
    #[arg(long = "set", value_name = "KEY.PATH=VALUE")]
    pub overrides: Vec<Override>,

    /// Reject unknown keys instead of ignoring them
    #[arg(long)]
    pub strict: bool,

    /// Ignore TRAINCONF_* environment overrides
    #[arg(long)]
    pub no_env: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct LoadOutput {
    pub source: PathBuf,
    pub overrides: Vec<String>,
    pub warnings: Vec<String>,
    pub config: TrainingConfig,
}

impl CommandOutput for LoadOutput {
    fn to_human(&self) -> String {
        self.config
            .to_yaml()
            .unwrap_or_else(|e| format!("# failed to render configuration: {e}"))
            .trim_end()
            .to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: LoadArgs, json_mode: bool) -> Result<()> {
    let mut overrides = if args.no_env {
        Vec::new()
    } else {
        Override::from_env(ENV_PREFIX).context("Failed to read environment overrides")?
    };
    overrides.extend(args.overrides);

    let options = LoadOptions {
        strict: args.strict,
    };
    let config = ConfigLoader::load_from_file(&args.path, &overrides, options)?;

    info!(
        path = %args.path.display(),
        name = %config.name,
        overrides = overrides.len(),
        "configuration valid"
    );

    let result = LoadOutput {
        source: args.path,
        overrides: overrides.iter().map(ToString::to_string).collect(),
        warnings: validation::warnings(&config),
        config,
    };
    output(&result, json_mode);
    Ok(())
}
