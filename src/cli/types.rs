//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use crate::cli::commands::keys::KeysArgs;
use crate::cli::commands::load::LoadArgs;
use crate::infrastructure::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "trainconf")]
#[command(about = "Load and validate training run configurations", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load, validate and print a configuration document
    Load(LoadArgs),

    /// List recognized configuration keys and their defaults
    Keys(KeysArgs),
}
