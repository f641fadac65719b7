//! Implementation of the `trainconf keys` command.

use anyhow::Result;
use clap::Args;
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::config::{known_keys, KeyInfo};

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Only list keys starting with this prefix, e.g. `optim`
    pub prefix: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct KeysOutput {
    pub keys: Vec<KeyInfo>,
}

impl CommandOutput for KeysOutput {
    fn to_human(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Key path").add_attribute(Attribute::Bold),
            Cell::new("Default").add_attribute(Attribute::Bold),
        ]);

        for key in &self.keys {
            table.add_row(vec![
                Cell::new(&key.key_path),
                Cell::new(render_default(&key.default)),
            ]);
        }

        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: KeysArgs, json_mode: bool) -> Result<()> {
    let keys = known_keys()?
        .into_iter()
        .filter(|key| {
            args.prefix
                .as_deref()
                .is_none_or(|prefix| matches_prefix(&key.key_path, prefix))
        })
        .collect();

    output(&KeysOutput { keys }, json_mode);
    Ok(())
}

/// Whether `key_path` is `prefix` or lies in the group it names.
fn matches_prefix(key_path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('.');
    key_path == prefix
        || key_path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
}

fn render_default(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
