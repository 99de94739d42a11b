//! Asynchronous buffered output
//!
//! Producers hand `(level, line)` pairs to a channel; one background worker
//! feeds them to the wrapped output in FIFO order. Producers only wait for
//! queue space, never for the wrapped output's I/O.

use crate::core::{LogLevel, LoggerError, LoggerMetrics, Output, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread;

struct BufferedLine {
    level: LogLevel,
    message: Vec<u8>,
}

pub struct BufferedOutput {
    sender: RwLock<Option<Sender<BufferedLine>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    capacity: usize,
    metrics: Arc<LoggerMetrics>,
}

impl BufferedOutput {
    /// Wrap `inner` behind a queue of `capacity` lines.
    ///
    /// A capacity of 0 makes every call a rendezvous with the worker.
    ///
    /// # Errors
    ///
    /// Returns error if the worker thread cannot be spawned
    pub fn new(inner: Arc<dyn Output>, capacity: usize) -> Result<Self> {
        let (sender, receiver) = bounded(capacity);
        let metrics = Arc::new(LoggerMetrics::new());
        let worker_metrics = Arc::clone(&metrics);

        let worker = thread::Builder::new()
            .name("hierlog-buffered".to_string())
            .spawn(move || Self::drain(receiver, inner, worker_metrics))?;

        Ok(Self {
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            capacity,
            metrics,
        })
    }

    fn drain(receiver: Receiver<BufferedLine>, inner: Arc<dyn Output>, metrics: Arc<LoggerMetrics>) {
        // ends once every sender is gone and the queue is empty
        for line in receiver.iter() {
            match inner.output(line.level, &line.message) {
                Ok(()) => {
                    metrics.record_delivered();
                }
                Err(e) => metrics.alert_failed("buffered output", &e),
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Delivery counters of the background worker
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Stop accepting lines, deliver everything already queued, and wait for
    /// the worker to exit. Later calls return once the first one finished.
    pub fn close(&self) {
        drop(self.sender.write().take());

        let mut worker = self.worker.lock();
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] Buffered output worker panicked during close");
            }
        }
    }
}

impl Output for BufferedOutput {
    fn output(&self, level: LogLevel, message: &[u8]) -> Result<()> {
        let line = BufferedLine {
            level,
            message: message.to_vec(),
        };
        // the read guard keeps close() from dropping the sender mid-send
        let sender = self.sender.read();
        match sender.as_ref() {
            Some(sender) => sender.send(line).map_err(|_| {
                LoggerError::WorkerFailed("buffered output worker is gone".to_string())
            }),
            None => Err(LoggerError::OutputClosed),
        }
    }
}

impl Drop for BufferedOutput {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for BufferedOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedOutput")
            .field("capacity", &self.capacity)
            .field("closed", &self.is_closed())
            .field("metrics", &self.metrics)
            .finish()
    }
}
