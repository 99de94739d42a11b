//! Log level definitions
//!
//! Levels are plain integers so callers can define their own values between
//! the named thresholds. Filtering only ever compares values; [`LogLevel::matched`]
//! collapses an arbitrary value onto the named threshold used for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LoggerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(i32);

impl LogLevel {
    /// Sentinel for "no threshold", sorts below every named level
    pub const UNSET: LogLevel = LogLevel(0);
    pub const DEBUG: LogLevel = LogLevel(10);
    pub const INFO: LogLevel = LogLevel(20);
    pub const NOTICE: LogLevel = LogLevel(30);
    pub const WARNING: LogLevel = LogLevel(40);
    pub const ERROR: LogLevel = LogLevel(50);
    pub const CRITICAL: LogLevel = LogLevel(60);

    /// Lowest representable level; a logger set here admits everything
    pub const MIN: LogLevel = LogLevel(i32::MIN);

    /// Named thresholds from least to most severe
    pub const NAMED: [LogLevel; 6] = [
        LogLevel::DEBUG,
        LogLevel::INFO,
        LogLevel::NOTICE,
        LogLevel::WARNING,
        LogLevel::ERROR,
        LogLevel::CRITICAL,
    ];

    #[inline]
    pub const fn new(value: i32) -> Self {
        LogLevel(value)
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Greatest named threshold that is `<= self`.
    ///
    /// Values above [`LogLevel::CRITICAL`] clamp to it; values below
    /// [`LogLevel::DEBUG`] (including negative ones) yield [`LogLevel::UNSET`].
    pub const fn matched(self) -> LogLevel {
        let v = self.0;
        if v >= LogLevel::CRITICAL.0 {
            LogLevel::CRITICAL
        } else if v >= LogLevel::ERROR.0 {
            LogLevel::ERROR
        } else if v >= LogLevel::WARNING.0 {
            LogLevel::WARNING
        } else if v >= LogLevel::NOTICE.0 {
            LogLevel::NOTICE
        } else if v >= LogLevel::INFO.0 {
            LogLevel::INFO
        } else if v >= LogLevel::DEBUG.0 {
            LogLevel::DEBUG
        } else {
            LogLevel::UNSET
        }
    }

    /// Short upper-case name used by the render templates
    pub fn to_str(&self) -> &'static str {
        match self.matched() {
            LogLevel::CRITICAL => "CRIT",
            LogLevel::ERROR => "ERR",
            LogLevel::WARNING => "WARN",
            LogLevel::NOTICE => "NOTE",
            LogLevel::INFO => "INFO",
            LogLevel::DEBUG => "DEBUG",
            _ => "UNSET",
        }
    }

    /// Long lower-case name, accepted back by `FromStr`
    pub fn name(&self) -> &'static str {
        match self.matched() {
            LogLevel::CRITICAL => "critical",
            LogLevel::ERROR => "error",
            LogLevel::WARNING => "warning",
            LogLevel::NOTICE => "notice",
            LogLevel::INFO => "info",
            LogLevel::DEBUG => "debug",
            _ => "unset",
        }
    }

    /// Short name left-justified to the width of the longest one
    pub fn justified(&self) -> String {
        format!("{:<5}", self.to_str())
    }

    /// Terminal color bucket for this level, `None` for unset
    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self.matched() {
            LogLevel::CRITICAL | LogLevel::ERROR => Some(Red),
            LogLevel::WARNING => Some(Magenta),
            LogLevel::NOTICE => Some(Yellow),
            LogLevel::INFO | LogLevel::DEBUG => Some(Green),
            _ => None,
        }
    }

    /// Closest `log` facade level, used when handing lines to other loggers
    pub fn to_log_level(&self) -> log::Level {
        match self.matched() {
            LogLevel::CRITICAL | LogLevel::ERROR => log::Level::Error,
            LogLevel::WARNING => log::Level::Warn,
            LogLevel::NOTICE | LogLevel::INFO => log::Level::Info,
            LogLevel::DEBUG => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::NOTICE
    }
}

impl From<i32> for LogLevel {
    fn from(value: i32) -> Self {
        LogLevel(value)
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::ERROR,
            log::Level::Warn => LogLevel::WARNING,
            log::Level::Info => LogLevel::INFO,
            log::Level::Debug => LogLevel::DEBUG,
            log::Level::Trace => LogLevel::new(LogLevel::DEBUG.0 - 5),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crit" | "critical" => Ok(LogLevel::CRITICAL),
            "err" | "error" => Ok(LogLevel::ERROR),
            "warn" | "warning" => Ok(LogLevel::WARNING),
            "note" | "notice" => Ok(LogLevel::NOTICE),
            "info" => Ok(LogLevel::INFO),
            "debug" => Ok(LogLevel::DEBUG),
            other => other
                .parse::<i32>()
                .map(LogLevel)
                .map_err(|_| LoggerError::config("level", format!("Invalid log level: '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_between_thresholds() {
        assert_eq!(LogLevel::new(43).matched(), LogLevel::WARNING);
        assert_eq!(LogLevel::new(10).matched(), LogLevel::DEBUG);
        assert_eq!(LogLevel::new(59).matched(), LogLevel::ERROR);
    }

    #[test]
    fn test_match_boundaries_are_asymmetric() {
        assert_eq!(LogLevel::new(1000).matched(), LogLevel::CRITICAL);
        assert_eq!(LogLevel::new(9).matched(), LogLevel::UNSET);
        assert_eq!(LogLevel::MIN.matched(), LogLevel::UNSET);
        assert_eq!(LogLevel::MIN.to_str(), "UNSET");
    }

    #[test]
    fn test_names() {
        assert_eq!(LogLevel::CRITICAL.to_str(), "CRIT");
        assert_eq!(LogLevel::NOTICE.name(), "notice");
        assert_eq!(LogLevel::new(45).to_string(), "WARN");
        assert_eq!(LogLevel::ERROR.justified(), "ERR  ");
        assert_eq!(LogLevel::DEBUG.justified(), "DEBUG");
    }

    #[test]
    fn test_parse() {
        assert_eq!("Crit".parse::<LogLevel>().unwrap(), LogLevel::CRITICAL);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::WARNING);
        assert_eq!("note".parse::<LogLevel>().unwrap(), LogLevel::NOTICE);
        assert_eq!("35".parse::<LogLevel>().unwrap(), LogLevel::new(35));
        assert_eq!("-7".parse::<LogLevel>().unwrap(), LogLevel::new(-7));
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_color_buckets() {
        use colored::Color;
        assert_eq!(LogLevel::CRITICAL.color_code(), Some(Color::Red));
        assert_eq!(LogLevel::ERROR.color_code(), Some(Color::Red));
        assert_eq!(LogLevel::WARNING.color_code(), Some(Color::Magenta));
        assert_eq!(LogLevel::NOTICE.color_code(), Some(Color::Yellow));
        assert_eq!(LogLevel::INFO.color_code(), Some(Color::Green));
        assert_eq!(LogLevel::DEBUG.color_code(), Some(Color::Green));
        assert_eq!(LogLevel::UNSET.color_code(), None);
    }

    #[test]
    fn test_default_is_notice() {
        assert_eq!(LogLevel::default(), LogLevel::NOTICE);
    }
}
