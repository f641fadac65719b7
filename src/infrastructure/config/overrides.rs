//! Dotted key-path overrides (`optim.lr=1e-4`).

use std::fmt;
use std::str::FromStr;

use figment::providers::Env;
use serde_yaml::{Mapping, Value};

use super::error::ConfigError;
use super::schema;

/// Replacement of one value in the document tree, addressed by key path.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    segments: Vec<String>,
    value: Value,
}

impl Override {
    /// Build an override from an already-typed value.
    pub fn new(key_path: &str, value: Value) -> Result<Self, ConfigError> {
        Ok(Self {
            segments: split_key_path(key_path)?,
            value,
        })
    }

    /// Build an override from a key path and the raw text of its value.
    ///
    /// The text is read as a YAML flow value, so `1e-4` is a float, `true` a
    /// bool and `[a, b]` a sequence. Text that is not valid YAML is kept as a
    /// plain string, and so is any value aimed at a text field (`name=42`).
    /// An empty value is rejected; `null` resets a field to its default.
    pub fn from_parts(key_path: &str, raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::parse(format!(
                "override `{key_path}` has no value"
            )));
        }
        let parsed = parse_scalar(raw);
        let value = if !parsed.is_null() && schema::is_text_field(key_path) {
            Value::String(raw.to_string())
        } else {
            parsed
        };
        Self::new(key_path, value)
    }

    /// Collect overrides from `PREFIX_GROUP__KEY=value` environment variables.
    ///
    /// Names are lowercased and `__` separates path segments, so
    /// `TRAINCONF_OPTIM__LR=1e-4` becomes `optim.lr=1e-4`. The result is
    /// sorted by key path.
    pub fn from_env(prefix: &str) -> Result<Vec<Self>, ConfigError> {
        let mut overrides = Env::prefixed(prefix)
            .split("__")
            .iter()
            .map(|(key, raw)| Self::from_parts(&key.as_str().to_ascii_lowercase(), &raw))
            .collect::<Result<Vec<_>, _>>()?;
        overrides.sort_by(|a, b| a.segments.cmp(&b.segments));
        Ok(overrides)
    }

    pub fn key_path(&self) -> String {
        self.segments.join(".")
    }

    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Set the value in `root`, creating intermediate groups as needed.
    pub fn apply(&self, root: &mut Value) -> Result<(), ConfigError> {
        let Some((leaf, parents)) = self.segments.split_last() else {
            return Err(ConfigError::parse("empty key path"));
        };

        let mut node = root;
        for (depth, segment) in parents.iter().enumerate() {
            let Value::Mapping(map) = node else {
                return Err(self.not_a_group(depth));
            };
            let child = map
                .entry(Value::from(segment.as_str()))
                .or_insert(Value::Null);
            if child.is_null() {
                *child = Value::Mapping(Mapping::new());
            }
            node = child;
        }

        let Value::Mapping(map) = node else {
            return Err(self.not_a_group(parents.len()));
        };
        map.insert(Value::from(leaf.as_str()), self.value.clone());
        Ok(())
    }

    fn not_a_group(&self, depth: usize) -> ConfigError {
        let parent = self.segments[..depth].join(".");
        ConfigError::validation(
            parent,
            format!("is not a group, cannot set {}", self.key_path()),
        )
    }
}

impl FromStr for Override {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key_path, raw) = s.split_once('=').ok_or_else(|| {
            ConfigError::parse(format!("override `{s}` is not of the form key.path=value"))
        })?;
        Self::from_parts(key_path.trim(), raw.trim())
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = serde_yaml::to_string(&self.value).unwrap_or_default();
        write!(f, "{}={}", self.key_path(), value.trim_end())
    }
}

fn split_key_path(key_path: &str) -> Result<Vec<String>, ConfigError> {
    let segments: Vec<String> = key_path.split('.').map(str::to_string).collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::parse(format!(
            "invalid key path `{key_path}`: empty segment"
        )));
    }
    Ok(segments)
}

fn parse_scalar(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_typed_values() {
        let lr: Override = "optim.lr=1e-4".parse().unwrap();
        assert_eq!(lr.key_path(), "optim.lr");
        assert_eq!(lr.value().as_f64(), Some(1e-4));

        let compile: Override = "distributed.compile=true".parse().unwrap();
        assert_eq!(compile.value().as_bool(), Some(true));

        let steps: Override = "steps=500".parse().unwrap();
        assert_eq!(steps.value().as_u64(), Some(500));

        let name: Override = "name=my run".parse().unwrap();
        assert_eq!(name.value().as_str(), Some("my run"));
    }

    #[test]
    fn test_text_field_keeps_raw_text() {
        let name: Override = "name=42".parse().unwrap();
        assert_eq!(name.value().as_str(), Some("42"));

        let path: Override = "data.tokenizer.path=1e-4".parse().unwrap();
        assert_eq!(path.value().as_str(), Some("1e-4"));

        let weight: Override = "data.sources.2024=0.5".parse().unwrap();
        assert_eq!(weight.value().as_f64(), Some(0.5));
    }

    #[test]
    fn test_empty_value_rejected() {
        assert!(matches!(
            "optim.lr=".parse::<Override>(),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            "name=  ".parse::<Override>(),
            Err(ConfigError::Parse { .. })
        ));

        let reset: Override = "optim.lr=null".parse().unwrap();
        assert!(reset.value().is_null());

        let reset: Override = "name=null".parse().unwrap();
        assert!(reset.value().is_null());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let o: Override = "data.root_dir=/mnt/a=b".parse().unwrap();
        assert_eq!(o.key_path(), "data.root_dir");
        assert_eq!(o.value().as_str(), Some("/mnt/a=b"));
    }

    #[test]
    fn test_malformed_overrides() {
        assert!(matches!(
            "optim.lr".parse::<Override>(),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            "optim..lr=1".parse::<Override>(),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            "=1".parse::<Override>(),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_apply_replaces_leaf() {
        let mut root = tree("optim:\n  lr: 0.0003\n  clip: 10.0\n");
        "optim.lr=0.001".parse::<Override>().unwrap().apply(&mut root).unwrap();

        assert_eq!(root["optim"]["lr"].as_f64(), Some(0.001));
        assert_eq!(root["optim"]["clip"].as_f64(), Some(10.0));
    }

    #[test]
    fn test_apply_creates_groups() {
        let mut root = tree("steps: 10\n");
        "checkpoint.eval.keep=3".parse::<Override>().unwrap().apply(&mut root).unwrap();
        assert_eq!(root["checkpoint"]["eval"]["keep"].as_u64(), Some(3));

        let mut root = tree("checkpoint:\n");
        "checkpoint.dump.every=5".parse::<Override>().unwrap().apply(&mut root).unwrap();
        assert_eq!(root["checkpoint"]["dump"]["every"].as_u64(), Some(5));
    }

    #[test]
    fn test_apply_through_scalar_fails() {
        let mut root = tree("steps: 10\n");
        let err = "steps.inner=1"
            .parse::<Override>()
            .unwrap()
            .apply(&mut root)
            .unwrap_err();
        assert_eq!(err.key_path(), Some("steps"));
        assert_eq!(root["steps"].as_u64(), Some(10));
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let o: Override = "data.sources.wiki=0.5".parse().unwrap();
        let mut once = tree("data:\n  sources:\n    web: 1.0\n");
        o.apply(&mut once).unwrap();
        let mut twice = once.clone();
        o.apply(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display() {
        let o: Override = "optim.warmup=20".parse().unwrap();
        assert_eq!(o.to_string(), "optim.warmup=20");
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("TRAINCONF_TEST_OPTIM__LR", Some("0.002")),
                ("TRAINCONF_TEST_STEPS", Some("40")),
            ],
            || {
                let overrides = Override::from_env("TRAINCONF_TEST_").unwrap();
                let paths: Vec<String> = overrides.iter().map(Override::key_path).collect();
                assert_eq!(paths, vec!["optim.lr", "steps"]);
                assert_eq!(overrides[0].value().as_f64(), Some(0.002));
                assert_eq!(overrides[1].value().as_u64(), Some(40));
            },
        );
    }
}
