use anyhow::Result;
use colored::Colorize;
use miraidev::{init_tracing, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// Loads configuration, initializes logging from it, then serves until shutdown.
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting MiraiDev API...".green());

    let cfg = super::load(config_path)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    info!(config = %config_path.display(), "Configuration loaded");

    server::start_server(cfg).await
}
