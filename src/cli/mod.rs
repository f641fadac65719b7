//! Command-line interface
//!
//! `trainconf load <path> [--set key.path=value ...] [--strict]` and
//! `trainconf keys [prefix]`.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::infrastructure::config::ConfigError;

/// Process exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::Parse { .. }) => 2,
        Some(ConfigError::Validation { .. }) => 3,
        Some(ConfigError::UnknownKey { .. }) => 4,
        Some(ConfigError::Io { .. } | ConfigError::Serialization(_)) | None => 1,
    }
}

/// Report a failed command on stderr and exit with its code.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let code = exit_code(&err);
    if json_mode {
        let body = serde_json::json!({
            "error": format!("{err:#}"),
            "key_path": err.downcast_ref::<ConfigError>().and_then(ConfigError::key_path),
            "exit_code": code,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("error: {err:#}");
    }
    std::process::exit(code)
}
