//! Rendering of command results.
//!
//! `load` prints the resolved configuration as YAML and `keys` prints a
//! table of key paths. With `--json` both print a JSON document instead.
//! Results go to stdout; logs and errors go to stderr.

use serde::Serialize;

/// A command result that can be shown to a person or to a script.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` on stdout in the selected format.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    let rendered = if json_mode {
        serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
    } else {
        result.to_human()
    };
    println!("{rendered}");
}
