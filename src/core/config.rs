//! Declarative default setup
//!
//! A [`LogConfig`] describes the level, line format and destination every
//! logger of a registry should use. It is plain data, usually read from JSON:
//!
//! ```
//! use hierlog::{LogConfig, LogLevel, Registry};
//!
//! let config = LogConfig::from_json(r#"{
//!     "level": "info",
//!     "filter": "^db\\.",
//!     "format": "standard",
//!     "output": "stdout"
//! }"#).unwrap();
//!
//! let registry = Registry::new();
//! let guard = config.apply(&registry).unwrap();
//! assert_eq!(registry.default_level(), LogLevel::INFO);
//! guard.close();
//! ```

use super::{
    error::{LoggerError, Result},
    handler::TextHandler,
    log_level::LogLevel,
    output::Output,
    registry::Registry,
    template::{Template, TemplatePreset},
};
use crate::outputs::{BufferedOutput, FileOutput, LogBridge, StdlibOutput, WriterOutput};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Default level, as a name or an integer
    pub level: Option<String>,
    /// Loggers whose name matches are set to debug
    pub filter: Option<String>,
    /// Preset name or a custom template; defaults to `color` on a terminal
    /// stream, `stdlib` for the `log` facade and `standard` for files
    pub format: Option<String>,
    /// `stderr`, `stdout`, `stdlib` (any case), or a file path
    pub output: String,
    /// Queue length of a buffered output, 0 writes synchronously
    pub buffer: usize,
    /// Reopen a file output on SIGHUP (unix only)
    pub reopen_on_hangup: bool,
    /// Prefix stripped from module paths when deriving logger names
    pub project_root: Option<String>,
    /// When set, `log` facade records at or above this level are routed into
    /// the logger `stdlog`, without call sites
    pub std_level: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: None,
            filter: None,
            format: None,
            output: "stderr".to_string(),
            buffer: 0,
            reopen_on_hangup: false,
            project_root: None,
            std_level: None,
        }
    }
}

/// Logger receiving records from the `log` facade
pub const STDLOG_LOGGER: &str = "stdlog";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stderr,
    Stdout,
    Stdlib,
    File(String),
}

impl Destination {
    fn parse(output: &str) -> Result<Self> {
        match output.to_lowercase().as_str() {
            "" => Err(LoggerError::config("output", "empty output")),
            "stderr" => Ok(Destination::Stderr),
            "stdout" => Ok(Destination::Stdout),
            "stdlib" => Ok(Destination::Stdlib),
            "syslog" => Err(LoggerError::config(
                "output",
                "syslog is not built in; install a syslog Output with Registry::set_text_output",
            )),
            _ => Ok(Destination::File(output.to_string())),
        }
    }

    fn default_template(&self) -> Arc<Template> {
        match self {
            Destination::Stderr | Destination::Stdout => Template::color(),
            Destination::Stdlib => Template::stdlib(),
            Destination::File(_) => Template::standard(),
        }
    }
}

/// Parsed form of a [`LogConfig`], produced before anything is changed
struct Plan {
    level: Option<LogLevel>,
    filter: Option<Regex>,
    destination: Destination,
    template: Arc<Template>,
    std_level: Option<LogLevel>,
}

impl LogConfig {
    /// # Errors
    ///
    /// Returns error if `json` is not a valid configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn plan(&self) -> Result<Plan> {
        let level = self
            .level
            .as_deref()
            .map(LogLevel::from_str)
            .transpose()?;
        let std_level = self
            .std_level
            .as_deref()
            .map(LogLevel::from_str)
            .transpose()?;
        let filter = self.filter.as_deref().map(Regex::new).transpose()?;
        let destination = Destination::parse(&self.output)?;
        let template = match self.format.as_deref() {
            None => destination.default_template(),
            Some(format) => match TemplatePreset::from_str(format) {
                Ok(preset) => preset.template(),
                Err(_) => Arc::new(Template::parse(format)?),
            },
        };

        if self.reopen_on_hangup && !matches!(destination, Destination::File(_)) {
            return Err(LoggerError::config(
                "reopen_on_hangup",
                format!("output '{}' is not a file", self.output),
            ));
        }
        if self.reopen_on_hangup && !cfg!(unix) {
            return Err(LoggerError::config(
                "reopen_on_hangup",
                "hang-up signals are only available on unix",
            ));
        }
        // facade records would come straight back through the stdlib output
        if std_level.is_some() && destination == Destination::Stdlib {
            return Err(LoggerError::config(
                "std_level",
                "cannot route the log facade into itself with output 'stdlib'",
            ));
        }

        Ok(Plan {
            level,
            filter,
            destination,
            template,
            std_level,
        })
    }

    /// Install this setup as the registry's defaults and push it to every
    /// existing logger.
    ///
    /// Nothing is changed in the registry if any part of the configuration is
    /// invalid, the output cannot be opened, or another `log` backend is
    /// already installed when `std_level` is set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for bad level names, patterns, templates,
    /// outputs, a `project_root` that differs from the registry's or a taken
    /// `log` backend, and an I/O error if the output cannot be opened
    pub fn apply(&self, registry: &Registry) -> Result<ConfigGuard> {
        if let Some(root) = &self.project_root {
            if root != registry.project_root() {
                return Err(LoggerError::config(
                    "project_root",
                    format!(
                        "registry was built with '{}', use LogConfig::build_registry",
                        registry.project_root()
                    ),
                ));
            }
        }
        let plan = self.plan()?;

        let mut guard = ConfigGuard::default();
        let output: Arc<dyn Output> = match &plan.destination {
            Destination::Stderr => Arc::new(WriterOutput::stderr()),
            Destination::Stdout => Arc::new(WriterOutput::stdout()),
            Destination::Stdlib => Arc::new(StdlibOutput::new()),
            Destination::File(path) => {
                let file = Arc::new(FileOutput::new(path)?);
                #[cfg(unix)]
                if self.reopen_on_hangup {
                    guard.hangup = Some(crate::outputs::reopen_on_hangup(&[Arc::clone(&file)])?);
                }
                file
            }
        };
        let output: Arc<dyn Output> = if self.buffer > 0 {
            let buffered = Arc::new(BufferedOutput::new(output, self.buffer)?);
            guard.buffered = Some(Arc::clone(&buffered));
            buffered
        } else {
            output
        };

        if let Some(std_level) = plan.std_level {
            LogBridge::new(registry.logger(STDLOG_LOGGER))
                .with_min_level(std_level)
                .install()
                .map_err(|e| LoggerError::config("std_level", e.to_string()))?;
        }

        registry.set_handler(None, Arc::new(TextHandler::new(plan.template, output)));
        if let Some(level) = plan.level {
            registry.set_level(None, level);
        }
        if let Some(filter) = &plan.filter {
            registry.set_level(Some(filter), LogLevel::DEBUG);
        }
        Ok(guard)
    }

    /// Fresh registry using `project_root`, with the rest of the setup applied
    ///
    /// # Errors
    ///
    /// Same as [`LogConfig::apply`]
    pub fn build_registry(&self) -> Result<(Registry, ConfigGuard)> {
        let registry = Registry::builder()
            .project_root(self.project_root.clone().unwrap_or_default())
            .build();
        let guard = self.apply(&registry)?;
        Ok((registry, guard))
    }
}

/// Resources started by [`LogConfig::apply`]
///
/// Dropping the guard stops them too; [`ConfigGuard::close`] makes the
/// shutdown point explicit.
#[derive(Default)]
pub struct ConfigGuard {
    buffered: Option<Arc<BufferedOutput>>,
    #[cfg(unix)]
    hangup: Option<crate::outputs::HangupGuard>,
}

impl ConfigGuard {
    /// The buffered output in use, if `buffer` was non-zero
    pub fn buffered(&self) -> Option<&Arc<BufferedOutput>> {
        self.buffered.as_ref()
    }

    /// Stop the hang-up listener, then drain and close the buffered output
    pub fn close(mut self) {
        #[cfg(unix)]
        if let Some(hangup) = self.hangup.take() {
            hangup.stop();
        }
        if let Some(buffered) = self.buffered.take() {
            buffered.close();
        }
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        if let Some(buffered) = &self.buffered {
            buffered.close();
        }
    }
}

impl std::fmt::Debug for ConfigGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("ConfigGuard");
        debug.field("buffered", &self.buffered.is_some());
        #[cfg(unix)]
        debug.field("hangup", &self.hangup.is_some());
        debug.finish()
    }
}
