//! Handler for the `check-config` command.

use std::path::Path;

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Validate configuration without touching the database.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => output::note(&format!("Checking configuration: {}", path.display())),
        None => output::note("Checking default configuration"),
    }
    println!();

    let config = Config::load_or_default(config_path)?;

    output::ok("configuration is valid");
    output::key_value("database.url", &config.database.url);
    output::key_value("logging.level", &config.logging.level);
    output::key_value("logging.format", &config.logging.format);

    if config.database.url.contains(":memory:") {
        output::note("database is memory-only and vanishes at process exit");
    }
    Ok(())
}
