//! Core logger types and traits

pub mod call_site;
pub mod config;
pub mod error;
pub mod handler;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output;
pub mod registry;
pub mod template;

pub use call_site::{derive_logger_name, CallSite, UNKNOWN_CALLER};
pub use config::{ConfigGuard, LogConfig};
pub use error::{LoggerError, Result};
pub use handler::{Handler, TextHandler};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::{LogWriter, Logger};
pub use metrics::LoggerMetrics;
pub use output::Output;
pub use registry::{default_registry, Registry, RegistryBuilder};
pub use template::{HelperFn, Helpers, Template, TemplatePreset};
