//! Trainconf - training run configuration loader
//!
//! Trainconf turns a YAML document describing a distributed language-model
//! training run into a typed, validated, immutable [`TrainingConfig`].
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): the configuration tree and its defaults
//! - **Infrastructure Layer** (`infrastructure`): document loading, overrides,
//!   validation and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use trainconf::{ConfigLoader, LoadOptions, Override};
//!
//! let overrides: Vec<Override> = vec!["optim.lr=1e-4".parse()?];
//! let config = ConfigLoader::load_from_file("configs/debug.yaml", &overrides, LoadOptions::strict())?;
//! assert!(config.optim.lr > 0.0);
//! # Ok::<(), trainconf::ConfigError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    CheckpointConfig, DataConfig, DistributedConfig, FsdpType, LoggingConfig, ModelConfig,
    ModelDtype, OptimConfig, ProfilingConfig, SaveEvery, Scheduler, TokenizerConfig,
    TokenizerKind, TrainingConfig,
};
pub use infrastructure::config::{ConfigError, ConfigLoader, LoadOptions, Override};
