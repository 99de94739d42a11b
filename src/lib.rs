//! # hierlog
//!
//! Hierarchically named loggers with per-name levels and pluggable,
//! template-driven output.
//!
//! ## Features
//!
//! - **Named loggers**: dotted names such as `svc.db.pool`, cached per registry
//! - **Cheap suppression**: a rejected call costs one atomic load
//! - **Pattern reconfiguration**: change levels or handlers of every logger
//!   whose name matches a regular expression
//! - **Templates**: colorized, plain, syslog and `log`-facade presets, or
//!   custom templates with helpers
//! - **Outputs**: any writer, rotation-aware files, the `log` facade, and a
//!   buffered wrapper that moves I/O to a background thread
//!
//! ## Example
//!
//! ```
//! use hierlog::prelude::*;
//! use hierlog::info;
//! use std::sync::Arc;
//!
//! let registry = Registry::builder()
//!     .level(LogLevel::INFO)
//!     .handler(Arc::new(TextHandler::new(
//!         Template::standard(),
//!         Arc::new(WriterOutput::stdout()),
//!     )))
//!     .build();
//!
//! let db = registry.logger("svc.db");
//! db.info("connected");
//! info!(db, "{} connections open", 4);
//! db.debug("not shown");
//!
//! registry.set_level_matching(r"^svc\.db$", LogLevel::DEBUG).unwrap();
//! db.debug("now shown");
//! ```

pub mod core;
pub mod macros;
pub mod outputs;

pub mod prelude {
    pub use crate::core::{
        default_registry, CallSite, ConfigGuard, Handler, LogConfig, LogEvent, LogLevel,
        LogWriter, Logger, LoggerError, LoggerMetrics, Output, Registry, RegistryBuilder, Result,
        Template, TemplatePreset, TextHandler,
    };
    pub use crate::outputs::{BufferedOutput, FileOutput, LogBridge, StdlibOutput, WriterOutput};
}

pub use crate::core::{
    default_registry, derive_logger_name, CallSite, ConfigGuard, Handler, HelperFn, Helpers,
    LogConfig, LogEvent, LogLevel, LogWriter, Logger, LoggerError, LoggerMetrics, Output,
    Registry, RegistryBuilder, Result, Template, TemplatePreset, TextHandler, UNKNOWN_CALLER,
};
pub use crate::outputs::{BufferedOutput, FileOutput, LogBridge, StdlibOutput, WriterOutput};

use std::sync::Arc;

/// Logger `name` from the default registry
pub fn logger(name: &str) -> Arc<Logger> {
    default_registry().logger(name)
}

/// Set the level of every logger in the default registry, and of those it
/// creates later
pub fn set_level(level: LogLevel) {
    default_registry().set_level(None, level);
}
