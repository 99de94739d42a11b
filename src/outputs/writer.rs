//! Direct writer output

use crate::core::{output::terminate_line, LogLevel, Output, Result};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes each line synchronously to any [`Write`] implementation.
///
/// Trailing CR/LF on the rendered line is replaced by a single newline.
/// Write errors are returned to the caller.
pub struct WriterOutput<W: Write + Send = Box<dyn Write + Send>> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterOutput {
    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl<W: Write + Send> Output for WriterOutput<W> {
    fn output(&self, _level: LogLevel, message: &[u8]) -> Result<()> {
        let line = terminate_line(message);
        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}
