//! Command implementations for the CLI
//!
//! - start: Start the API server
//! - test: Check configuration and Supabase connectivity
//! - config: Configuration display and validation
//! - quote: Price a project from the terminal
//! - stats: One-shot dashboard stats

pub mod config;
pub mod quote;
pub mod start;
pub mod stats;

use anyhow::{Context, Result};
use miraidev::config::{load_config, Config};
use std::path::Path;

/// Load and validate the configuration file
pub(crate) fn load(path: &Path) -> Result<Config> {
    load_config(path).with_context(|| format!("Failed to load configuration from {}", path.display()))
}
