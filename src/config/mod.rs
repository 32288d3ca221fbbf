//! Configuration module - Engine settings and user preferences
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.flash-expand/config.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, MenuConfig)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::*;

pub use types::{Config, MenuConfig};

pub use loader::{load_config, load_config_from};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
