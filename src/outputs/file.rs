//! Rotation-aware file output
//!
//! External rotation (logrotate and friends) renames the live file and then
//! signals the process. Until the reopen request arrives, writes keep going to
//! the already-open handle, which now names the renamed file. The first write
//! after the request opens the original path again, creating a fresh file.

use crate::core::{output::terminate_line, LogLevel, LoggerError, Output, Result};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct FileOutput {
    path: PathBuf,
    file: RwLock<Arc<File>>,
    reopen_requested: AtomicBool,
}

impl FileOutput {
    /// Open `path` for appending, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or opened
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = Self::open(&path)?;
        Ok(Self {
            path,
            file: RwLock::new(Arc::new(file)),
            reopen_requested: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ask for the path to be reopened before the next write.
    ///
    /// Safe to call from any thread, including a signal-handling thread.
    pub fn request_reopen(&self) {
        self.reopen_requested.store(true, Ordering::Release);
    }

    pub fn reopen_pending(&self) -> bool {
        self.reopen_requested.load(Ordering::Acquire)
    }

    fn open(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_output(path.display().to_string(), format!("Failed to open: {}", e))
            })
    }

    /// Handle to write the next line to, reopening first if requested
    fn current(&self) -> Result<Arc<File>> {
        if self.reopen_requested.load(Ordering::Acquire) {
            let mut file = self.file.write();
            // another writer may have reopened while we waited for the lock
            if self.reopen_requested.swap(false, Ordering::AcqRel) {
                match Self::open(&self.path) {
                    Ok(fresh) => *file = Arc::new(fresh),
                    Err(e) => {
                        self.reopen_requested.store(true, Ordering::Release);
                        return Err(e);
                    }
                }
            }
            return Ok(Arc::clone(&file));
        }
        Ok(Arc::clone(&self.file.read()))
    }
}

impl Output for FileOutput {
    fn output(&self, _level: LogLevel, message: &[u8]) -> Result<()> {
        let line = terminate_line(message);
        let file = self.current()?;
        // one write_all per line on an O_APPEND handle keeps lines whole
        (&*file).write_all(&line).map_err(|e| {
            LoggerError::io_operation(
                "writing log file",
                self.path.display().to_string(),
                e,
            )
        })
    }
}

impl std::fmt::Debug for FileOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileOutput")
            .field("path", &self.path)
            .field("reopen_pending", &self.reopen_pending())
            .finish()
    }
}

#[cfg(unix)]
pub use self::hangup::{reopen_on_hangup, HangupGuard};

#[cfg(unix)]
mod hangup {
    use super::FileOutput;
    use crate::core::{LoggerError, Result};
    use signal_hook::consts::SIGHUP;
    use signal_hook::iterator::{Handle, Signals};
    use std::sync::{Arc, Weak};
    use std::thread;

    /// Stops the hang-up listener when dropped
    pub struct HangupGuard {
        handle: Handle,
        thread: Option<thread::JoinHandle<()>>,
    }

    impl HangupGuard {
        /// Stop listening and wait for the listener thread
        pub fn stop(mut self) {
            self.shutdown();
        }

        fn shutdown(&mut self) {
            self.handle.close();
            if let Some(thread) = self.thread.take() {
                if thread.join().is_err() {
                    eprintln!("[LOGGER ERROR] Hang-up listener thread panicked");
                }
            }
        }
    }

    impl Drop for HangupGuard {
        fn drop(&mut self) {
            self.shutdown();
        }
    }

    /// Request a reopen of each given output whenever the process gets SIGHUP
    pub fn reopen_on_hangup(outputs: &[Arc<FileOutput>]) -> Result<HangupGuard> {
        let mut signals = Signals::new([SIGHUP]).map_err(|e| {
            LoggerError::io_operation("registering SIGHUP handler", "signal-hook", e)
        })?;
        let handle = signals.handle();
        let targets: Vec<Weak<FileOutput>> = outputs.iter().map(Arc::downgrade).collect();

        let thread = thread::Builder::new()
            .name("hierlog-sighup".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    for target in targets.iter().filter_map(Weak::upgrade) {
                        target.request_reopen();
                    }
                }
            })?;

        Ok(HangupGuard {
            handle,
            thread: Some(thread),
        })
    }
}
