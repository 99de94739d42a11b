//! Basic logger usage example
//!
//! Demonstrates named loggers, levels, scoping and pattern reconfiguration.
//!
//! Run with: cargo run --example basic_usage

use hierlog::prelude::*;
use hierlog::{get_logger, info, warn};

fn main() -> Result<()> {
    println!("=== hierlog - Basic Usage Example ===\n");

    let registry = Registry::builder().level(LogLevel::DEBUG).build();

    println!("1. Logging at different levels:");
    let app = registry.logger("app");
    app.debug("This is a debug message");
    app.info("This is an info message");
    app.notice("This is a notice");
    app.warn("This is a warning message");
    app.error("This is an error message");
    app.crit("This is a critical message");

    println!("\n2. Formatted messages and errors:");
    info!(app, "Listening on port {}", 8080);
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "settings.toml missing");
    app.log_err(LogLevel::WARNING, &err);

    println!("\n3. Scoped loggers start from their parent:");
    let db = registry.scope(&app, "db");
    db.set_level(LogLevel::WARNING);
    db.info("Info message (hidden)");
    warn!(db, "Pool at {}% capacity", 90);

    println!("\n4. Pattern reconfiguration:");
    registry.set_level_matching(r"^app\.db$", LogLevel::DEBUG)?;
    db.debug("db is verbose again");
    app.set_level(LogLevel::ERROR);
    app.info("Info message (hidden)");

    println!("\n5. Logger named after this module:");
    let here = get_logger!(registry);
    here.notice(format_args!("my name is '{}'", here.name()));

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
