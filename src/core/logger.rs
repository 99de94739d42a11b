//! Named logger handles
//!
//! A [`Logger`] is obtained from a [`Registry`](super::Registry) and lives as
//! long as the registry. Every call first compares against the logger's level
//! with a single atomic load; rejected calls do no other work.

use super::{call_site::CallSite, handler::Handler, log_level::LogLevel};
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

pub struct Logger {
    name: String,
    level: AtomicI32,
    handler: RwLock<Arc<dyn Handler>>,
}

impl Logger {
    pub(crate) fn new(name: String, level: LogLevel, handler: Arc<dyn Handler>) -> Self {
        Self {
            name,
            level: AtomicI32::new(level.value()),
            handler: RwLock::new(handler),
        }
    }

    /// Dotted, immutable logger name
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::new(self.level.load(Ordering::Relaxed))
    }

    /// Change this logger's level only; other loggers are never affected
    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level.value(), Ordering::Relaxed);
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        self.handler.read().clone()
    }

    pub fn set_handler(&self, handler: Arc<dyn Handler>) {
        *self.handler.write() = handler;
    }

    /// Whether a call at `level` would reach the handler
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Log `message` at an arbitrary level.
    ///
    /// `message` is only formatted when the level check passes, so passing
    /// `format_args!(..)` costs nothing for suppressed calls.
    #[track_caller]
    #[inline]
    pub fn log(&self, level: LogLevel, message: impl Display) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, &message.to_string(), Some(CallSite::caller()));
    }

    /// Log an error's description at `level`
    #[track_caller]
    #[inline]
    pub fn log_err<E: Error + ?Sized>(&self, level: LogLevel, err: &E) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, &err.to_string(), Some(CallSite::caller()));
    }

    /// Like [`Logger::log`] but never collects the call site, for adapters
    /// whose immediate caller is not the code that produced the message
    #[inline]
    pub fn log_without_call_site(&self, level: LogLevel, message: impl Display) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, &message.to_string(), None);
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl Display) {
        self.log(LogLevel::DEBUG, message);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl Display) {
        self.log(LogLevel::INFO, message);
    }

    #[track_caller]
    #[inline]
    pub fn notice(&self, message: impl Display) {
        self.log(LogLevel::NOTICE, message);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: impl Display) {
        self.log(LogLevel::WARNING, message);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl Display) {
        self.log(LogLevel::ERROR, message);
    }

    #[track_caller]
    #[inline]
    pub fn crit(&self, message: impl Display) {
        self.log(LogLevel::CRITICAL, message);
    }

    /// An [`io::Write`] adapter logging each write as one message at `level`.
    ///
    /// Trailing line breaks are stripped. Call sites are not collected, and
    /// sink failures never surface as write errors.
    pub fn writer(self: &Arc<Self>, level: LogLevel) -> LogWriter {
        LogWriter {
            logger: Arc::clone(self),
            level,
        }
    }

    fn dispatch(&self, level: LogLevel, message: &str, call_site: Option<CallSite>) {
        let handler = self.handler();
        handler.log(&self.name, level, message, call_site);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .finish()
    }
}

/// Byte-stream adapter returned by [`Logger::writer`]
#[derive(Debug, Clone)]
pub struct LogWriter {
    logger: Arc<Logger>,
    level: LogLevel,
}

impl LogWriter {
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.logger
            .log_without_call_site(self.level, text.trim_end_matches(['\n', '\r']));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;

    #[derive(Default)]
    struct Record {
        calls: Mutex<Vec<(String, LogLevel, String, Option<CallSite>)>>,
    }

    impl Handler for Record {
        fn log(&self, name: &str, level: LogLevel, message: &str, call_site: Option<CallSite>) {
            self.calls
                .lock()
                .push((name.to_string(), level, message.to_string(), call_site));
        }
    }

    fn logger(level: LogLevel) -> (Arc<Logger>, Arc<Record>) {
        let record = Arc::new(Record::default());
        let logger = Arc::new(Logger::new("test.logger".to_string(), level, record.clone()));
        (logger, record)
    }

    #[test]
    fn test_level_gate() {
        let (logger, record) = logger(LogLevel::WARNING);
        logger.debug("no");
        logger.info("no");
        logger.notice("no");
        logger.warn("yes");
        logger.error("yes");
        logger.crit("yes");
        logger.log(LogLevel::new(39), "no");
        logger.log(LogLevel::new(41), "yes");

        let calls = record.calls.lock();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|c| c.2 == "yes"));
    }

    #[test]
    fn test_call_site_is_the_caller() {
        let (logger, record) = logger(LogLevel::DEBUG);
        let line = line!() + 1;
        logger.info("here");

        let calls = record.calls.lock();
        let site = calls[0].3.expect("call site collected");
        assert_eq!(site.line, line);
        assert_eq!(site.file_name(), "logger.rs");
    }

    #[test]
    fn test_error_and_formatted_shapes() {
        let (logger, record) = logger(LogLevel::DEBUG);
        let err = io::Error::new(io::ErrorKind::NotFound, "config missing");
        logger.log_err(LogLevel::ERROR, &err);
        logger.info(format_args!("{} + {} = {}", 1, 2, 3));

        let calls = record.calls.lock();
        assert_eq!(calls[0].1, LogLevel::ERROR);
        assert_eq!(calls[0].2, "config missing");
        assert_eq!(calls[1].2, "1 + 2 = 3");
    }

    #[test]
    fn test_writer_adapter() {
        let (logger, record) = logger(LogLevel::INFO);
        let mut writer = logger.writer(LogLevel::INFO);
        writer.write_all(b"x\n").unwrap();
        writer.write_all(b"y\n").unwrap();

        let mut quiet = logger.writer(LogLevel::DEBUG);
        assert_eq!(quiet.write(b"dropped\n").unwrap(), 8);

        let calls = record.calls.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].2, "x");
        assert_eq!(calls[1].2, "y");
        assert!(calls.iter().all(|c| c.1 == LogLevel::INFO && c.3.is_none()));
    }

    #[test]
    fn test_set_level_and_handler_in_place() {
        let (logger, first) = logger(LogLevel::ERROR);
        logger.info("suppressed");
        logger.set_level(LogLevel::DEBUG);
        assert_eq!(logger.level(), LogLevel::DEBUG);

        let second = Arc::new(Record::default());
        logger.set_handler(second.clone());
        logger.info("routed");

        assert!(first.calls.lock().is_empty());
        assert_eq!(second.calls.lock().len(), 1);
    }
}
