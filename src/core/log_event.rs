//! Log event structure

use super::call_site::CallSite;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use colored::Color;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const UNDERLINE: &str = "\x1b[4m";

/// One log occurrence as seen by a render template.
///
/// Built by the handler after the level check passed; never shared and
/// never modified once rendering starts.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub logger_name: String,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub call_site: Option<CallSite>,
}

impl LogEvent {
    pub fn new(logger_name: &str, level: LogLevel, message: &str) -> Self {
        Self {
            logger_name: logger_name.to_string(),
            level,
            message: message.trim_end_matches(['\n', '\r']).to_string(),
            timestamp: Local::now(),
            call_site: None,
        }
    }

    pub fn with_call_site(mut self, call_site: Option<CallSite>) -> Self {
        self.call_site = call_site;
        self
    }

    /// Full source path, empty without a call site
    pub fn filepath(&self) -> &str {
        self.call_site.map(|site| site.file).unwrap_or("")
    }

    /// Source file basename, empty without a call site
    pub fn filename(&self) -> &str {
        self.call_site.map(|site| site.file_name()).unwrap_or("")
    }

    /// Source line, 0 without a call site
    pub fn line(&self) -> u32 {
        self.call_site.map(|site| site.line).unwrap_or(0)
    }

    pub fn date(&self) -> String {
        self.timestamp.format("%Y/%m/%d").to_string()
    }

    pub fn time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    pub fn iso_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
    }

    pub fn reset() -> &'static str {
        RESET
    }

    pub fn bold() -> &'static str {
        BOLD
    }

    pub fn underline() -> &'static str {
        UNDERLINE
    }

    /// Foreground escape sequence for one of the eight basic colors
    pub fn color(color: Color) -> String {
        format!("\x1b[{}m", color.to_fg_str())
    }

    /// Escape sequence for this event's level bucket, empty for unset levels
    pub fn level_color(&self) -> String {
        self.level.color_code().map(Self::color).unwrap_or_default()
    }
}
