//! Output implementations

pub mod bridge;
pub mod buffered;
pub mod file;
pub mod stdlib;
pub mod writer;

pub use bridge::LogBridge;
pub use buffered::BufferedOutput;
pub use file::FileOutput;
pub use stdlib::{StdlibOutput, STDLIB_TARGET};
pub use writer::WriterOutput;

#[cfg(unix)]
pub use file::{reopen_on_hangup, HangupGuard};

pub use crate::core::Output;
