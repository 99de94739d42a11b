//! Output into the `log` facade
//!
//! Useful before the application has decided where logs go: lines end up
//! wherever the installed `log` backend sends them.
//!
//! Do not combine with a [`LogBridge`](super::LogBridge) that feeds `log`
//! records back into the same loggers. Every line would be logged again,
//! without end.

use crate::core::{output::terminate_line, LogLevel, Output, Result};

/// Target used for records produced by [`StdlibOutput`]
pub const STDLIB_TARGET: &str = "hierlog";

#[derive(Debug, Clone, Copy, Default)]
pub struct StdlibOutput;

impl StdlibOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for StdlibOutput {
    fn output(&self, level: LogLevel, message: &[u8]) -> Result<()> {
        let line = terminate_line(message);
        let text = String::from_utf8_lossy(&line[..line.len() - 1]);
        log::log!(target: STDLIB_TARGET, level.to_log_level(), "{}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_fails() {
        // without an installed backend the facade discards records
        let output = StdlibOutput::new();
        assert!(output.output(LogLevel::CRITICAL, b"to the facade\n").is_ok());
        assert!(output.output(LogLevel::UNSET, b"").is_ok());
    }
}
