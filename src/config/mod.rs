//! Configuration module for netquery
//!
//! Handles loading and validating network settings from YAML files and environment variables.

mod settings;

pub use settings::*;
