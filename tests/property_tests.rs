//! Property-based tests for hierlog using proptest

use hierlog::prelude::*;
use hierlog::derive_logger_name;
use proptest::prelude::*;
use std::sync::Arc;

fn named_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::DEBUG),
        Just(LogLevel::INFO),
        Just(LogLevel::NOTICE),
        Just(LogLevel::WARNING),
        Just(LogLevel::ERROR),
        Just(LogLevel::CRITICAL),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Matching twice gives the same threshold as matching once
    #[test]
    fn test_matched_is_idempotent(value in any::<i32>()) {
        let once = LogLevel::new(value).matched();
        prop_assert_eq!(once.matched(), once);
    }

    /// The result is always a named threshold or the unset sentinel
    #[test]
    fn test_matched_is_named_or_unset(value in any::<i32>()) {
        let matched = LogLevel::new(value).matched();
        prop_assert!(matched == LogLevel::UNSET || LogLevel::NAMED.contains(&matched));
    }

    /// For non-negative values the match is the greatest threshold not above it
    #[test]
    fn test_matched_is_greatest_lower_threshold(value in 0..i32::MAX) {
        let matched = LogLevel::new(value).matched();
        prop_assert!(matched.value() <= value);
        for named in LogLevel::NAMED {
            if named.value() <= value {
                prop_assert!(named <= matched);
            }
        }
    }

    /// Values below the lowest threshold, negatives included, are unset
    #[test]
    fn test_below_debug_is_unset(value in i32::MIN..10) {
        prop_assert_eq!(LogLevel::new(value).matched(), LogLevel::UNSET);
    }

    /// Short names parse back to the same threshold
    #[test]
    fn test_short_name_roundtrip(level in named_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(parsed, level);
    }

    /// Integers parse to themselves
    #[test]
    fn test_integer_parse(value in any::<i32>()) {
        let parsed: LogLevel = value.to_string().parse().unwrap();
        prop_assert_eq!(parsed.value(), value);
    }
}

// ============================================================================
// Logger gating
// ============================================================================

struct Count(parking_lot::Mutex<Vec<LogLevel>>);

impl Handler for Count {
    fn log(&self, _: &str, level: LogLevel, _: &str, _: Option<CallSite>) {
        self.0.lock().push(level);
    }
}

proptest! {
    /// A logger at L2 suppresses L1 < L2 and admits L2 and above
    #[test]
    fn test_logger_gates_named_levels(gate in named_level(), call in named_level()) {
        let count = Arc::new(Count(parking_lot::Mutex::new(Vec::new())));
        let registry = Registry::builder().level(gate).handler(count.clone()).build();
        let logger = registry.logger("gate");

        logger.log(call, "probe");

        let admitted = count.0.lock().len() == 1;
        prop_assert_eq!(admitted, call >= gate);
        prop_assert_eq!(logger.enabled(call), call >= gate);
    }
}

// ============================================================================
// Logger names
// ============================================================================

proptest! {
    /// Derived names only use the sanitized alphabet and are never empty
    #[test]
    fn test_derived_names_are_sanitized(path in ".*", root in "[a-z_]{0,8}(::)?") {
        let name = derive_logger_name(Some(&path), &root);
        prop_assert!(!name.is_empty());
        prop_assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')));
    }

    /// Module paths become dotted names below the project root
    #[test]
    fn test_module_paths_become_dotted(parts in prop::collection::vec("[a-z_][a-z0-9_]{0,6}", 1..5)) {
        let path = format!("app::{}", parts.join("::"));
        prop_assert_eq!(derive_logger_name(Some(&path), "app::"), parts.join("."));
    }
}
