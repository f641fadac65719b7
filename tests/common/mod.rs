//! Common test utilities for integration tests
//!
//! Provides the shared fixture document and helpers used across
//! multiple integration test files.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use trainconf::{ConfigLoader, LoadOptions, Override, TrainingConfig};

/// Path of the debug run document shipped with the crate
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs/debug.yaml")
}

/// Contents of the debug run document
pub fn fixture_document() -> String {
    std::fs::read_to_string(fixture_path()).expect("Fixture document should be readable")
}

/// Load the fixture with the given overrides
pub fn load_fixture(overrides: &[&str], strict: bool) -> Result<TrainingConfig, trainconf::ConfigError> {
    let overrides: Vec<Override> = overrides
        .iter()
        .map(|s| s.parse().expect("Override should parse"))
        .collect();
    ConfigLoader::load_str(&fixture_document(), &overrides, LoadOptions { strict })
}

/// Write a document to a temporary file
pub fn write_document(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
