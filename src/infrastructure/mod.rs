//! Infrastructure layer module
//!
//! This module contains everything that deals with the outside world:
//! - Configuration loading, overrides and validation
//! - Logging infrastructure

pub mod config;
pub mod logging;
