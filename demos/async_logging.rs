//! Async logging example
//!
//! Demonstrates worker-pool logging from several threads, overflow handling
//! and metrics.
//!
//! Run with: cargo run --example async_logging

use pipe_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Pipe Logger - Async Logging Example ===\n");

    // Four workers, at most 1000 records waiting
    let logger = Arc::new(
        Logger::builder()
            .min_level(LogLevel::Debug)
            .emitter(ConsoleEmitter::new())
            .async_mode(4, Some(1000))
            .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
            .on_error(|err| eprintln!("[demo] async failure: {}", err))
            .build()?,
    );

    println!("1. High-performance async logging:");
    for i in 0..100 {
        logger.info(format!("Message #{}", i))?;
    }

    println!("\n2. Multi-threaded logging (per-thread order is preserved):");
    let handles: Vec<_> = (0..4)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..10 {
                    let _ = logger.debug(format!("Thread {} - step {}", thread_id, i));
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    // Every accepted record is written before shutdown returns
    logger.shutdown()?;

    let metrics = logger.metrics();
    println!("\n3. Metrics:");
    println!("   Emitted: {}", metrics.emitted_count());
    println!("   Dropped: {}", metrics.dropped_count());
    println!("   Failure rate: {:.2}%", metrics.failure_rate());

    match logger.info("too late") {
        Err(LoggerError::LoggerStopped) => println!("   Logging after shutdown is refused"),
        other => println!("   Unexpected: {:?}", other),
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
