//! Basic logger usage example
//!
//! Demonstrates synchronous logging to the console, level filtering and the
//! level macros.
//!
//! Run with: cargo run --example basic_usage

use pipe_logger::prelude::*;
use pipe_logger::{info, warning};

fn main() -> Result<()> {
    println!("=== Pipe Logger - Basic Usage Example ===\n");

    // Create a synchronous logger writing to stdout
    let logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .formatter(pipe_logger::ColoredFormatter::default())
        .emitter(ConsoleEmitter::new())
        .build()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warning("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.fatal("This is a fatal message")?;

    println!("\n2. Level macros attach the module path:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port)?;
    warning!(logger, "Retry attempt {} of {}", 3, 5)?;

    println!("\n3. A logger with minimum level WARN (trace..info hidden):");
    let quiet = Logger::builder()
        .min_level(LogLevel::Warning)
        .emitter(ConsoleEmitter::new())
        .build()?;
    quiet.debug("Debug message (hidden)")?;
    quiet.info("Info message (hidden)")?;
    quiet.warning("Warning message (visible)")?;
    println!(
        "   is_enabled(Info) = {}, is_enabled(Error) = {}",
        quiet.is_enabled(LogLevel::Info),
        quiet.is_enabled(LogLevel::Error)
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
