use std::path::Path;

use figment::providers::Serialized;
use figment::Figment;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use super::error::ConfigError;
use super::overrides::Override;
use super::schema;
use super::validation;
use crate::domain::models::TrainingConfig;

/// Options controlling how a document is loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject key paths that are not part of the configuration instead of
    /// ignoring them with a warning
    pub strict: bool,
}

impl LoadOptions {
    pub const fn strict() -> Self {
        Self { strict: true }
    }
}

/// Configuration loader with layered merging
///
/// Precedence (lowest to highest):
/// 1. Programmatic defaults (Serialized)
/// 2. The YAML document
/// 3. Key-path overrides, in the order given
///
/// Loading never touches the paths a configuration refers to.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration from YAML text.
    pub fn load_str(
        document: &str,
        overrides: &[Override],
        options: LoadOptions,
    ) -> Result<TrainingConfig, ConfigError> {
        let mut tree = Self::parse_document(document)?;
        for o in overrides {
            debug!(key_path = %o.key_path(), "applying override");
            o.apply(&mut tree)?;
        }
        Self::build(tree, options)
    }

    /// Load a configuration from a YAML file.
    pub fn load_from_file(
        path: impl AsRef<Path>,
        overrides: &[Override],
        options: LoadOptions,
    ) -> Result<TrainingConfig, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = document.len(), "read configuration document");
        Self::load_str(&document, overrides, options)
    }

    /// Build a new configuration with one value replaced.
    ///
    /// `config` is left untouched. Unknown key paths are always rejected
    /// here, since an ignored override on an existing config would be lost
    /// without a trace.
    pub fn apply_override(
        config: &TrainingConfig,
        o: &Override,
    ) -> Result<TrainingConfig, ConfigError> {
        let mut tree = serde_yaml::to_value(config)?;
        o.apply(&mut tree)?;
        Self::build(tree, LoadOptions::strict())
    }

    /// Validate configuration after loading.
    pub fn validate(config: &TrainingConfig) -> Result<(), ConfigError> {
        validation::validate(config)
    }

    /// Parse YAML text into a document tree whose root is a mapping.
    ///
    /// An empty document is an empty mapping.
    pub fn parse_document(document: &str) -> Result<Value, ConfigError> {
        if is_blank(document) {
            return Ok(Value::Mapping(Mapping::new()));
        }
        let tree: Value =
            serde_yaml::from_str(document).map_err(|e| ConfigError::parse(e.to_string()))?;
        match tree {
            Value::Null => Ok(Value::Mapping(Mapping::new())),
            Value::Mapping(_) => Ok(tree),
            other => Err(ConfigError::parse(format!(
                "document root must be a mapping, found {}",
                kind_of(&other)
            ))),
        }
    }

    fn build(mut tree: Value, options: LoadOptions) -> Result<TrainingConfig, ConfigError> {
        strip_nulls(&mut tree, "")?;
        schema::normalize(&mut tree)?;

        let unknown = schema::unknown_key_paths(&tree)?;
        if !unknown.is_empty() {
            if options.strict {
                return Err(ConfigError::UnknownKey { key_paths: unknown });
            }
            for key_path in &unknown {
                warn!(key_path = %key_path, "ignoring unknown configuration key");
            }
        }

        let config = Self::extract(tree)?;
        Self::validate(&config)?;

        for message in validation::warnings(&config) {
            warn!("{message}");
        }
        debug!(name = %config.name, steps = config.steps, "configuration loaded");
        Ok(config)
    }

    fn extract(tree: Value) -> Result<TrainingConfig, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(TrainingConfig::default()))
            .merge(Serialized::defaults(tree))
            .extract()
            .map_err(extraction_error)
    }
}

/// Turn a figment extraction failure into a validation error on its key path.
fn extraction_error(err: figment::Error) -> ConfigError {
    let key_path = if err.path.is_empty() {
        "<root>".to_string()
    } else {
        err.path.join(".")
    };
    ConfigError::validation(key_path, format!("has an invalid value: {}", err.kind))
}

/// Only whitespace, comments and document markers.
fn is_blank(document: &str) -> bool {
    document.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Drop null entries so that `key:` with no value falls back to its default.
///
/// Entries of open groups have no default, so a null there is an error.
fn strip_nulls(node: &mut Value, prefix: &str) -> Result<(), ConfigError> {
    let Value::Mapping(map) = node else {
        return Ok(());
    };

    if schema::OPEN_GROUPS.contains(&prefix) {
        if let Some((key, _)) = map.iter().find(|(_, v)| v.is_null()) {
            return Err(ConfigError::validation(
                schema::join(prefix, &schema::key_name(key)),
                "has no value",
            ));
        }
        return Ok(());
    }

    map.retain(|_, v| !v.is_null());
    for (key, child) in map.iter_mut() {
        strip_nulls(child, &schema::join(prefix, &schema::key_name(key)))?;
    }
    Ok(())
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
