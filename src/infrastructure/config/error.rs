use std::path::PathBuf;

use thiserror::Error;

/// Configuration error types
///
/// Loading either returns a fully validated config or one of these; nothing
/// is partially applied.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document, or an override string, is not well-formed.
    #[error("failed to parse configuration: {message}")]
    Parse { message: String },

    /// A field violates its domain or a cross-field invariant.
    #[error("{key_path} {reason}")]
    Validation { key_path: String, reason: String },

    /// Key paths that are not part of the configuration (strict mode).
    #[error("unknown configuration key(s): {}", key_paths.join(", "))]
    UnknownKey { key_paths: Vec<String> },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialization(String),
}

impl ConfigError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn validation(key_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            key_path: key_path.into(),
            reason: reason.into(),
        }
    }

    /// Key path the error is about, when there is exactly one.
    pub fn key_path(&self) -> Option<&str> {
        match self {
            Self::Validation { key_path, .. } => Some(key_path),
            Self::UnknownKey { key_paths } if key_paths.len() == 1 => {
                key_paths.first().map(String::as_str)
            }
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
