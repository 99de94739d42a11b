//! File logging example
//!
//! Demonstrates a rotation-aware file output configured from JSON.
//!
//! Run with: cargo run --example file_logging

use hierlog::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== hierlog - File Logging Example ===\n");

    let registry = Registry::new();
    let config = LogConfig::from_json(
        r#"{
            "level": "info",
            "filter": "^app\\.plugins",
            "format": "standard",
            "output": "application.log"
        }"#,
    )?;
    let guard = config.apply(&registry)?;

    println!("1. Logging to 'application.log':");
    let app = registry.logger("app");
    app.info("Application started");
    app.debug("Loading configuration (hidden)");
    app.warn("Using default settings for some options");
    registry.logger("app.plugins").debug("Plugin scan is always verbose");

    println!("\n2. Rotating the file:");
    let file = Arc::new(FileOutput::new("application.log")?);
    registry.set_text_output(None, file.clone());
    app.info("Written before rotation");
    std::fs::rename("application.log", "application.log.1")?;
    file.request_reopen();
    app.info("Written to a fresh application.log");

    guard.close();

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'application.log.1'");

    Ok(())
}
