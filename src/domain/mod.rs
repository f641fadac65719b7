//! Domain layer for training configurations
//!
//! This module contains the typed configuration tree and its documented
//! defaults. It has no knowledge of documents, overrides, or the CLI.

pub mod models;
