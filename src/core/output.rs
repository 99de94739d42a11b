//! Output trait for rendered log lines

use super::{error::Result, log_level::LogLevel};
use std::sync::Arc;

/// Final consumer of rendered bytes.
///
/// Implementations are shared between loggers and threads, so they take
/// `&self` and synchronize internally.
pub trait Output: Send + Sync {
    fn output(&self, level: LogLevel, message: &[u8]) -> Result<()>;
}

impl<O: Output + ?Sized> Output for Arc<O> {
    fn output(&self, level: LogLevel, message: &[u8]) -> Result<()> {
        (**self).output(level, message)
    }
}

impl<O: Output + ?Sized> Output for Box<O> {
    fn output(&self, level: LogLevel, message: &[u8]) -> Result<()> {
        (**self).output(level, message)
    }
}

/// Strip trailing CR/LF and terminate with exactly one newline
pub(crate) fn terminate_line(message: &[u8]) -> Vec<u8> {
    let end = message
        .iter()
        .rposition(|b| *b != b'\n' && *b != b'\r')
        .map(|i| i + 1)
        .unwrap_or(0);
    let mut line = Vec::with_capacity(end + 1);
    line.extend_from_slice(&message[..end]);
    line.push(b'\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_line() {
        assert_eq!(terminate_line(b"hello"), b"hello\n");
        assert_eq!(terminate_line(b"hello\r\n\n"), b"hello\n");
        assert_eq!(terminate_line(b"a\nb\n"), b"a\nb\n");
        assert_eq!(terminate_line(b"\n"), b"\n");
        assert_eq!(terminate_line(b""), b"\n");
    }
}
