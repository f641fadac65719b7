//! Configuration management infrastructure
//!
//! Layered loading of training configurations using figment:
//! - YAML document parsing
//! - Dotted key-path overrides (CLI and environment)
//! - Unknown key detection (strict or lenient)
//! - Validation of field domains and cross-field invariants

pub mod error;
pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use error::ConfigError;
pub use loader::{ConfigLoader, LoadOptions};
pub use overrides::Override;
pub use schema::{known_keys, KeyInfo};
