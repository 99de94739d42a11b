//! Registry of named loggers
//!
//! The registry owns every [`Logger`] it hands out together with the
//! defaults new loggers start from. Reconfiguration is done by regular
//! expression over full logger names; "no pattern" means the new value
//! becomes the default and is applied to every existing logger.
//!
//! Hierarchy is a naming convention only. A logger created through
//! [`Registry::scope`] copies its parent's level and handler once and is
//! independent afterwards.

use super::{
    call_site::{derive_logger_name, CallSite},
    error::Result,
    handler::{Handler, TextHandler},
    log_level::LogLevel,
    logger::Logger,
    output::Output,
    template::Template,
};
use crate::outputs::WriterOutput;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

struct RegistryState {
    loggers: HashMap<String, Arc<Logger>>,
    level: LogLevel,
    handler: Arc<dyn Handler>,
}

impl RegistryState {
    fn matching<'a>(&'a self, pattern: Option<&'a Regex>) -> impl Iterator<Item = &'a Arc<Logger>> {
        self.loggers
            .iter()
            .filter(move |(name, _)| pattern.map_or(true, |re| re.is_match(name)))
            .map(|(_, logger)| logger)
    }
}

pub struct Registry {
    state: Mutex<RegistryState>,
    project_root: String,
}

impl Registry {
    /// Registry with level Notice writing colorized lines to stderr
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Cached logger for `name`, created from the current defaults if absent
    pub fn logger(&self, name: &str) -> Arc<Logger> {
        let mut state = self.state.lock();
        if let Some(logger) = state.loggers.get(name) {
            return Arc::clone(logger);
        }
        let logger = Arc::new(Logger::new(
            name.to_string(),
            state.level,
            Arc::clone(&state.handler),
        ));
        state.loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Logger named after the caller's module path, see [`Registry::derive_name`]
    pub fn logger_for_caller(&self, call_site: Option<&CallSite>) -> Arc<Logger> {
        let name = self.derive_name(call_site);
        self.logger(&name)
    }

    /// Dotted logger name for a call site, `unknown.unknown` when unavailable
    pub fn derive_name(&self, call_site: Option<&CallSite>) -> String {
        derive_logger_name(call_site.and_then(|site| site.module_path), &self.project_root)
    }

    /// Child logger `parent.suffix`, seeded once from the parent's current
    /// level and handler. An existing logger of that name is returned as is.
    pub fn scope(&self, parent: &Logger, suffix: &str) -> Arc<Logger> {
        let name = format!("{}.{}", parent.name(), suffix);
        let level = parent.level();
        let handler = parent.handler();

        let mut state = self.state.lock();
        let logger = state
            .loggers
            .entry(name)
            .or_insert_with_key(|name| Arc::new(Logger::new(name.clone(), level, handler)));
        Arc::clone(logger)
    }

    /// Set the level of loggers matching `pattern`, or the default and every
    /// logger when `pattern` is `None`
    pub fn set_level(&self, pattern: Option<&Regex>, level: LogLevel) {
        let mut state = self.state.lock();
        if pattern.is_none() {
            state.level = level;
        }
        for logger in state.matching(pattern) {
            logger.set_level(level);
        }
    }

    /// Replace the handler of loggers matching `pattern`, or the default and
    /// every logger when `pattern` is `None`
    pub fn set_handler(&self, pattern: Option<&Regex>, handler: Arc<dyn Handler>) {
        let mut state = self.state.lock();
        if pattern.is_none() {
            state.handler = Arc::clone(&handler);
        }
        for logger in state.matching(pattern) {
            logger.set_handler(Arc::clone(&handler));
        }
    }

    /// Swap the template inside the handlers of matching loggers
    pub fn set_text_template(&self, pattern: Option<&Regex>, template: Arc<Template>) {
        let state = self.state.lock();
        if pattern.is_none() {
            state.handler.set_text_template(Arc::clone(&template));
        }
        for logger in state.matching(pattern) {
            logger.handler().set_text_template(Arc::clone(&template));
        }
    }

    /// Swap the output inside the handlers of matching loggers
    pub fn set_text_output(&self, pattern: Option<&Regex>, output: Arc<dyn Output>) {
        let state = self.state.lock();
        if pattern.is_none() {
            state.handler.set_text_output(Arc::clone(&output));
        }
        for logger in state.matching(pattern) {
            logger.handler().set_text_output(Arc::clone(&output));
        }
    }

    /// [`Registry::set_level`] with a pattern given as text
    pub fn set_level_matching(&self, pattern: &str, level: LogLevel) -> Result<()> {
        let re = Regex::new(pattern)?;
        self.set_level(Some(&re), level);
        Ok(())
    }

    /// [`Registry::set_handler`] with a pattern given as text
    pub fn set_handler_matching(&self, pattern: &str, handler: Arc<dyn Handler>) -> Result<()> {
        let re = Regex::new(pattern)?;
        self.set_handler(Some(&re), handler);
        Ok(())
    }

    pub fn default_level(&self) -> LogLevel {
        self.state.lock().level
    }

    pub fn default_handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.state.lock().handler)
    }

    pub fn project_root(&self) -> &str {
        &self.project_root
    }

    /// Names of every logger created so far, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().loggers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Registry")
            .field("loggers", &state.loggers.len())
            .field("level", &state.level)
            .field("project_root", &self.project_root)
            .finish()
    }
}

/// Builder for constructing a [`Registry`] with a fluent API
///
/// # Example
/// ```
/// use hierlog::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Registry::builder()
///     .level(LogLevel::DEBUG)
///     .handler(Arc::new(TextHandler::new(
///         Template::standard(),
///         Arc::new(WriterOutput::stdout()),
///     )))
///     .project_root("my_service::")
///     .build();
/// assert_eq!(registry.default_level(), LogLevel::DEBUG);
/// ```
pub struct RegistryBuilder {
    level: LogLevel,
    handler: Option<Arc<dyn Handler>>,
    project_root: String,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            level: LogLevel::default(),
            handler: None,
            project_root: String::new(),
        }
    }

    /// Level new loggers start at
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Handler new loggers start with
    #[must_use = "builder methods return a new value"]
    pub fn handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Prefix stripped from module paths when deriving logger names
    #[must_use = "builder methods return a new value"]
    pub fn project_root(mut self, prefix: impl Into<String>) -> Self {
        self.project_root = prefix.into();
        self
    }

    pub fn build(self) -> Registry {
        let handler = self.handler.unwrap_or_else(|| {
            Arc::new(TextHandler::new(
                Template::color(),
                Arc::new(WriterOutput::stderr()),
            ))
        });
        Registry {
            state: Mutex::new(RegistryState {
                loggers: HashMap::new(),
                level: self.level,
                handler,
            }),
            project_root: self.project_root,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry used by [`get_logger!`](crate::get_logger) and the
/// free functions at the crate root. Libraries and tests should prefer an
/// explicitly constructed [`Registry`].
pub fn default_registry() -> &'static Registry {
    static DEFAULT: OnceLock<Registry> = OnceLock::new();
    DEFAULT.get_or_init(Registry::new)
}

/// Logger for the calling module from the default registry, or from the
/// registry given as argument
#[macro_export]
macro_rules! get_logger {
    () => {
        $crate::get_logger!($crate::core::default_registry())
    };
    ($registry:expr) => {
        $registry.logger_for_caller(Some(&$crate::call_site!()))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl Handler for Silent {
        fn log(&self, _: &str, _: LogLevel, _: &str, _: Option<CallSite>) {}
    }

    fn registry() -> Registry {
        Registry::builder().handler(Arc::new(Silent)).build()
    }

    #[test]
    fn test_logger_is_cached() {
        let registry = registry();
        let a = registry.logger("svc.db");
        let b = registry.logger("svc.db");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.logger_names(), vec!["svc.db".to_string()]);
    }

    #[test]
    fn test_new_logger_takes_current_defaults() {
        let registry = registry();
        let early = registry.logger("early");
        registry.set_level(None, LogLevel::ERROR);
        let late = registry.logger("late");

        assert_eq!(early.level(), LogLevel::ERROR);
        assert_eq!(late.level(), LogLevel::ERROR);
        assert_eq!(registry.default_level(), LogLevel::ERROR);
    }

    #[test]
    fn test_pattern_leaves_default_alone() {
        let registry = registry();
        let net = registry.logger("svc.net");
        let db = registry.logger("svc.db");

        registry.set_level_matching(r"\.net$", LogLevel::DEBUG).unwrap();

        assert_eq!(net.level(), LogLevel::DEBUG);
        assert_eq!(db.level(), LogLevel::NOTICE);
        assert_eq!(registry.default_level(), LogLevel::NOTICE);
        assert_eq!(registry.logger("svc.net2").level(), LogLevel::NOTICE);
    }

    #[test]
    fn test_bad_pattern_is_reported() {
        let registry = registry();
        let err = registry.set_level_matching("(", LogLevel::DEBUG).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_set_handler_pattern() {
        let registry = registry();
        let a = registry.logger("a");
        let b = registry.logger("b");
        let replacement: Arc<dyn Handler> = Arc::new(Silent);

        registry.set_handler_matching("^a$", Arc::clone(&replacement)).unwrap();

        assert!(Arc::ptr_eq(&a.handler(), &replacement));
        assert!(!Arc::ptr_eq(&b.handler(), &replacement));
        assert!(!Arc::ptr_eq(&registry.default_handler(), &replacement));
    }

    #[test]
    fn test_scope_is_a_one_time_seed() {
        let registry = registry();
        let parent = registry.logger("a");
        parent.set_level(LogLevel::WARNING);

        let child = registry.scope(&parent, "b");
        assert_eq!(child.name(), "a.b");
        assert_eq!(child.level(), LogLevel::WARNING);
        assert!(Arc::ptr_eq(&child, &registry.logger("a.b")));

        registry.set_level_matching("^a$", LogLevel::DEBUG).unwrap();
        assert_eq!(parent.level(), LogLevel::DEBUG);
        assert_eq!(child.level(), LogLevel::WARNING);
    }

    #[test]
    fn test_derive_name_uses_project_root() {
        let registry = Registry::builder()
            .handler(Arc::new(Silent))
            .project_root("hierlog::")
            .build();
        let logger = crate::get_logger!(registry);
        assert_eq!(logger.name(), "core.registry.tests");
        assert_eq!(registry.derive_name(None), "unknown.unknown");
    }
}
