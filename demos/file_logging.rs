//! File logging example
//!
//! Demonstrates logging to an already-open file, with per-write advisory
//! locking so several processes can share one log file.
//!
//! Run with: cargo run --example file_logging

use pipe_logger::emitters::FileEmitter;
use pipe_logger::prelude::*;
use std::fs::OpenOptions;

fn main() -> Result<()> {
    println!("=== Pipe Logger - File Logging Example ===\n");

    // The logger never opens or rotates paths; the application does
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("application.log")?;

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .timestamp_format(TimestampFormat::Iso8601Micros)
        .emitter(RetryingEmitter::new(FileEmitter::new(file).with_advisory_lock(true), 2))
        .build()?;

    println!("1. Logging to application.log:");
    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    logger.warning("Using default settings for some options")?;
    logger.error("Failed to load optional plugin")?;
    logger.info("Application initialization complete")?;
    logger.flush()?;

    println!("\n2. Reading the records back:");
    let formatter = DefaultFormatter::new().with_timestamp_format(TimestampFormat::Iso8601Micros);
    for line in std::fs::read_to_string("application.log")?.lines().rev().take(5) {
        let parsed = formatter.parse_line(line)?;
        println!("   {:5} {} {}", parsed.level, parsed.timestamp, parsed.message);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
