//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration decoding error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid logger name pattern
    #[error("Invalid logger name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Template could not be parsed
    #[error("Template syntax error at offset {offset}: {message}")]
    TemplateSyntax { offset: usize, message: String },

    /// Template failed while rendering an event
    #[error("Template render failed in {helper}: {message}")]
    RenderFailed { helper: String, message: String },

    /// File output error with path
    #[error("File output error for '{path}': {message}")]
    FileOutputError { path: String, message: String },

    /// Buffered output no longer accepts messages
    #[error("Output already closed")]
    OutputClosed,

    /// Background worker failure
    #[error("Output worker failed: {0}")]
    WorkerFailed(String),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a template syntax error
    pub fn template_syntax(offset: usize, message: impl Into<String>) -> Self {
        LoggerError::TemplateSyntax {
            offset,
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(helper: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::RenderFailed {
            helper: helper.into(),
            message: message.into(),
        }
    }

    /// Create a file output error
    pub fn file_output(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileOutputError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error came from bad configuration input rather than I/O
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidConfiguration { .. }
                | LoggerError::InvalidPattern(_)
                | LoggerError::TemplateSyntax { .. }
                | LoggerError::JsonError(_)
        )
    }
}
