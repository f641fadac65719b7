//! Recognized key paths, derived from the defaults of [`TrainingConfig`].

use serde_yaml::Value;

use super::error::ConfigError;
use crate::domain::models::TrainingConfig;

/// Groups whose keys are user-chosen names rather than fixed fields.
pub(crate) const OPEN_GROUPS: &[&str] = &["data.sources"];

/// Optional text fields. Their default is `None`, which carries no type.
const OPTIONAL_TEXT: &[&str] = &[
    "data.tokenizer.path",
    "checkpoint.path",
    "checkpoint.init_ckpt_path",
];

/// A recognized leaf key path and its default value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct KeyInfo {
    pub key_path: String,
    pub default: Value,
}

/// The default configuration as a document tree.
pub fn schema_tree() -> Result<Value, ConfigError> {
    Ok(serde_yaml::to_value(TrainingConfig::default())?)
}

/// Every recognized leaf key path with its default, in document order.
pub fn known_keys() -> Result<Vec<KeyInfo>, ConfigError> {
    let mut keys = Vec::new();
    collect_leaves(&schema_tree()?, "", &mut keys);
    Ok(keys)
}

/// Key paths in `tree` that are not part of the configuration.
pub fn unknown_key_paths(tree: &Value) -> Result<Vec<String>, ConfigError> {
    let mut unknown = Vec::new();
    collect_unknown(tree, &schema_tree()?, "", &mut unknown);
    Ok(unknown)
}

/// Whether `key_path` names a text field (`name`, `dump_dir`, paths).
pub fn is_text_field(key_path: &str) -> bool {
    if OPTIONAL_TEXT.contains(&key_path) {
        return true;
    }
    schema_tree().is_ok_and(|tree| {
        key_path
            .split('.')
            .try_fold(&tree, |node, segment| node.get(segment))
            .is_some_and(Value::is_string)
    })
}

/// Bring a document tree into the shape extraction expects.
///
/// Numbers and bools at text fields become strings (`name: 2024`), and the
/// keys of open groups become strings (`2024: 1.0` under `data.sources`).
pub fn normalize(tree: &mut Value) -> Result<(), ConfigError> {
    normalize_node(tree, &schema_tree()?, "");
    Ok(())
}

fn normalize_node(node: &mut Value, schema: &Value, prefix: &str) {
    if OPEN_GROUPS.contains(&prefix) {
        if let Value::Mapping(map) = node {
            *map = std::mem::take(map)
                .into_iter()
                .map(|(key, child)| (Value::String(key_name(&key)), child))
                .collect();
        }
        return;
    }

    if let (Value::Mapping(map), Value::Mapping(schema)) = (&mut *node, schema) {
        for (key, child) in map.iter_mut() {
            if let Some(expected) = schema.get(key) {
                normalize_node(child, expected, &join(prefix, &key_name(key)));
            }
        }
        return;
    }

    let is_text = schema.is_string() || OPTIONAL_TEXT.contains(&prefix);
    if is_text && matches!(node, Value::Number(_) | Value::Bool(_)) {
        let text = key_name(node);
        *node = Value::String(text);
    }
}

fn collect_leaves(node: &Value, prefix: &str, out: &mut Vec<KeyInfo>) {
    match node {
        Value::Mapping(map) if !OPEN_GROUPS.contains(&prefix) => {
            for (key, child) in map {
                collect_leaves(child, &join(prefix, &key_name(key)), out);
            }
        }
        _ => out.push(KeyInfo {
            key_path: prefix.to_string(),
            default: node.clone(),
        }),
    }
}

fn collect_unknown(node: &Value, schema: &Value, prefix: &str, out: &mut Vec<String>) {
    if OPEN_GROUPS.contains(&prefix) {
        return;
    }
    // Type mismatches below this point are reported by extraction.
    let (Value::Mapping(node), Value::Mapping(schema)) = (node, schema) else {
        return;
    };
    for (key, child) in node {
        let path = join(prefix, &key_name(key));
        match schema.get(key) {
            Some(expected) => collect_unknown(child, expected, &path, out),
            None => collect_paths(child, path, out),
        }
    }
}

fn collect_paths(node: &Value, path: String, out: &mut Vec<String>) {
    match node {
        Value::Mapping(map) if !map.is_empty() => {
            for (key, child) in map {
                collect_paths(child, join(&path, &key_name(key)), out);
            }
        }
        _ => out.push(path),
    }
}

/// Render a mapping key (or scalar) as a key-path segment.
pub(crate) fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

pub(crate) fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
