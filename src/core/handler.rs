//! Handlers turn accepted log calls into rendered output

use super::{
    call_site::CallSite, log_event::LogEvent, log_level::LogLevel, metrics::LoggerMetrics,
    output::Output, template::Template,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Receives every log call that passed a logger's level check.
pub trait Handler: Send + Sync {
    /// `call_site` is `None` when the caller opted out of call-site collection
    fn log(&self, logger_name: &str, level: LogLevel, message: &str, call_site: Option<CallSite>);

    /// No-op for handlers that do not render text
    fn set_text_template(&self, _template: Arc<Template>) {}

    /// No-op for handlers that do not render text
    fn set_text_output(&self, _output: Arc<dyn Output>) {}
}

/// Renders events through a [`Template`] and forwards them to an [`Output`].
///
/// Template and output can be swapped while other threads are logging; each
/// call renders against one consistent snapshot of both.
pub struct TextHandler {
    template: RwLock<Arc<Template>>,
    output: RwLock<Arc<dyn Output>>,
    metrics: LoggerMetrics,
}

impl TextHandler {
    pub fn new(template: Arc<Template>, output: Arc<dyn Output>) -> Self {
        Self {
            template: RwLock::new(template),
            output: RwLock::new(output),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn template(&self) -> Arc<Template> {
        self.template.read().clone()
    }

    pub fn output(&self) -> Arc<dyn Output> {
        self.output.read().clone()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn snapshot(&self) -> (Arc<Template>, Arc<dyn Output>) {
        let template = self.template.read();
        let output = self.output.read();
        (Arc::clone(&template), Arc::clone(&output))
    }

    fn deliver(&self, output: &dyn Output, level: LogLevel, bytes: &[u8]) {
        match output.output(level, bytes) {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(e) => self.metrics.alert_failed("text handler output", &e),
        }
    }
}

impl Handler for TextHandler {
    fn log(&self, logger_name: &str, level: LogLevel, message: &str, call_site: Option<CallSite>) {
        let (template, output) = self.snapshot();
        let event = LogEvent::new(logger_name, level, message).with_call_site(call_site);

        match template.render(&event) {
            Ok(rendered) => self.deliver(output.as_ref(), level, rendered.as_bytes()),
            Err(e) => {
                self.metrics.record_render_failure();
                let diagnostic = format!("log format template failed: {}", e);
                self.deliver(output.as_ref(), level, diagnostic.as_bytes());
            }
        }
    }

    fn set_text_template(&self, template: Arc<Template>) {
        *self.template.write() = template;
    }

    fn set_text_output(&self, output: Arc<dyn Output>) {
        *self.output.write() = output;
    }
}

impl std::fmt::Debug for TextHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextHandler")
            .field("template", &self.template.read().name())
            .field("metrics", &self.metrics)
            .finish()
    }
}
