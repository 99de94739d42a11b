//! Logging macros for the formatted call shape.
//!
//! Arguments are wrapped in `format_args!`, so nothing is formatted unless
//! the logger's level lets the call through. The call site recorded is the
//! macro invocation.
//!
//! # Examples
//!
//! ```
//! use hierlog::prelude::*;
//! use hierlog::{info, warn};
//!
//! let registry = Registry::new();
//! let logger = registry.logger("server");
//!
//! let port = 8080;
//! info!(logger, "listening on port {}", port);
//! warn!(logger, "retry {} of {}", 3, 5);
//! ```

/// Log at an arbitrary level.
///
/// ```
/// # use hierlog::prelude::*;
/// # let logger = Registry::new().logger("app");
/// use hierlog::log;
/// log!(logger, LogLevel::ERROR, "status {}", 500);
/// log!(logger, LogLevel::new(35), "between notice and warning");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::INFO, $($arg)+)
    };
}

#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::NOTICE, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::WARNING, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::ERROR, $($arg)+)
    };
}

/// Log a critical message.
///
/// ```
/// # use hierlog::prelude::*;
/// # let logger = Registry::new().logger("app");
/// use hierlog::crit;
/// crit!(logger, "unable to recover: {}", "disk full");
/// ```
#[macro_export]
macro_rules! crit {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::CRITICAL, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{CallSite, Handler, LogLevel, Registry};
    use parking_lot::Mutex;
    use std::fmt;
    use std::sync::Arc;

    #[derive(Default)]
    struct Record {
        calls: Mutex<Vec<(LogLevel, String, Option<CallSite>)>>,
    }

    impl Handler for Record {
        fn log(&self, _name: &str, level: LogLevel, message: &str, call_site: Option<CallSite>) {
            self.calls
                .lock()
                .push((level, message.to_string(), call_site));
        }
    }

    struct Counted<'a>(&'a Mutex<u32>);

    impl fmt::Display for Counted<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            *self.0.lock() += 1;
            f.write_str("counted")
        }
    }

    fn setup(level: LogLevel) -> (Arc<crate::Logger>, Arc<Record>) {
        let record = Arc::new(Record::default());
        let registry = Registry::builder()
            .level(level)
            .handler(record.clone())
            .build();
        (registry.logger("macros"), record)
    }

    #[test]
    fn test_every_severity() {
        let (logger, record) = setup(LogLevel::DEBUG);
        debug!(logger, "d{}", 1);
        info!(logger, "i{}", 2);
        notice!(logger, "n{}", 3);
        warn!(logger, "w{}", 4);
        error!(logger, "e{}", 5);
        crit!(logger, "c{}", 6);
        log!(logger, LogLevel::new(45), "custom");

        let calls = record.calls.lock();
        let levels: Vec<i32> = calls.iter().map(|c| c.0.value()).collect();
        assert_eq!(levels, vec![10, 20, 30, 40, 50, 60, 45]);
        assert_eq!(calls[2].1, "n3");
    }

    #[test]
    fn test_call_site_is_macro_invocation() {
        let (logger, record) = setup(LogLevel::DEBUG);
        let line = line!() + 1;
        info!(logger, "here");

        let calls = record.calls.lock();
        assert_eq!(calls[0].2.map(|site| site.line), Some(line));
    }

    #[test]
    fn test_suppressed_arguments_are_not_formatted() {
        let (logger, record) = setup(LogLevel::ERROR);
        let count = Mutex::new(0);
        info!(logger, "{}", Counted(&count));
        assert_eq!(*count.lock(), 0);

        error!(logger, "{}", Counted(&count));
        assert_eq!(*count.lock(), 1);
        assert_eq!(record.calls.lock().len(), 1);
    }
}
