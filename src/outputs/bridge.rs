//! Route `log` facade records into a [`Logger`]

use crate::core::{LogLevel, Logger};
use std::sync::Arc;

/// A [`log::Log`] backend that forwards every record to one logger.
///
/// Records are passed on without call sites; the `log` record's target is
/// prepended to the message. Install with [`LogBridge::install`].
#[derive(Debug)]
pub struct LogBridge {
    logger: Arc<Logger>,
    min_level: LogLevel,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            min_level: LogLevel::MIN,
        }
    }

    /// Drop records below `level` before they reach the logger
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Install as the global `log` backend. Fails if one is already set.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    fn level_of(&self, record_level: log::Level) -> Option<LogLevel> {
        let level = LogLevel::from(record_level);
        (level >= self.min_level && self.logger.enabled(level)).then_some(level)
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.level_of(metadata.level()).is_some()
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Some(level) = self.level_of(record.level()) {
            self.logger.log_without_call_site(
                level,
                format_args!("{}: {}", record.target(), record.args()),
            );
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, Handler, Registry};
    use log::Log;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Record {
        calls: Mutex<Vec<(LogLevel, String, bool)>>,
    }

    impl Handler for Record {
        fn log(&self, _: &str, level: LogLevel, message: &str, call_site: Option<CallSite>) {
            self.calls
                .lock()
                .push((level, message.to_string(), call_site.is_some()));
        }
    }

    #[test]
    fn test_forwards_records() {
        let record = Arc::new(Record::default());
        let registry = Registry::builder()
            .level(LogLevel::INFO)
            .handler(record.clone())
            .build();
        let bridge = LogBridge::new(registry.logger("stdlog")).with_min_level(LogLevel::WARNING);

        bridge.log(
            &log::Record::builder()
                .level(log::Level::Error)
                .target("db")
                .args(format_args!("lost {} rows", 3))
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .target("db")
                .args(format_args!("filtered"))
                .build(),
        );

        let calls = record.calls.lock();
        assert_eq!(calls.as_slice(), &[(LogLevel::ERROR, "db: lost 3 rows".to_string(), false)]);
    }

    #[test]
    fn test_enabled_follows_logger_level() {
        let record = Arc::new(Record::default());
        let registry = Registry::builder()
            .level(LogLevel::ERROR)
            .handler(record)
            .build();
        let bridge = LogBridge::new(registry.logger("stdlog"));

        let warn = log::Metadata::builder().level(log::Level::Warn).build();
        let error = log::Metadata::builder().level(log::Level::Error).build();
        assert!(!bridge.enabled(&warn));
        assert!(bridge.enabled(&error));
    }
}
