//! Buffered logging example
//!
//! Demonstrates moving output I/O to a background thread with several
//! producer threads.
//!
//! Run with: cargo run --example async_logging

use hierlog::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== hierlog - Buffered Logging Example ===\n");

    let file = Arc::new(FileOutput::new("async_test.log")?);
    let buffered = Arc::new(BufferedOutput::new(file, 1000)?);
    let registry = Arc::new(
        Registry::builder()
            .level(LogLevel::INFO)
            .handler(Arc::new(TextHandler::new(Template::standard(), buffered.clone())))
            .build(),
    );

    println!("1. High-throughput logging:");
    let main_logger = registry.logger("main");
    for i in 0..100 {
        main_logger.info(format_args!("Message #{}", i));
    }
    println!("   Logged 100 messages without waiting for the file");

    println!("\n2. Multi-threaded logging:");
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let logger = registry.logger(&format!("worker.{}", thread_id));
                for i in 0..20 {
                    logger.info(format_args!("Message {}", i));
                    thread::sleep(Duration::from_millis(10));
                }
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker thread panicked");
        }
    }
    println!("   5 threads logged 20 messages each");

    // drains the queue before returning
    buffered.close();
    println!("   Delivered {} lines", buffered.metrics().delivered());

    println!("\n=== Example completed successfully! ===");
    println!("Check 'async_test.log' for file output");

    Ok(())
}
