//! Integration tests for the logger
//!
//! These tests verify, against real files:
//! - Log injection prevention
//! - Record integrity and ordering under both strategies
//! - Level filtering
//! - Builder configuration errors
//! - Timestamp format support

use pipe_logger::emitters::{FileEmitter, FlushPolicy, StreamEmitter};
use pipe_logger::prelude::*;
use pipe_logger::{info, warning};
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn open_append(path: &Path) -> File {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("Failed to open log file")
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let logger = Logger::builder()
        .emitter(FileEmitter::new(open_append(&log_file)))
        .build()
        .expect("Failed to build logger");

    // Try to inject fake log entries with newlines
    let malicious_message = "User login\n[ERROR][2024-10-17T00:00:00.000Z][-] Fake error\r\nINFO Continuation";
    logger.info(malicious_message).unwrap();
    logger.flush().expect("Failed to flush");

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1, "Log should be a single line, not multiple");
    assert!(lines[0].contains("\\n[ERROR]"));
    assert!(lines[0].contains("\\r\\n"));
}

#[test]
fn test_sync_concurrent_lines_well_formed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("sync_concurrent.log");

    let logger = Arc::new(
        Logger::builder()
            .min_level(LogLevel::Trace)
            .timestamp_format(TimestampFormat::Iso8601Micros)
            .emitter(StreamEmitter::new(BufWriter::new(open_append(&log_file))))
            .build()
            .expect("Failed to build logger"),
    );

    let threads = 8;
    let per_thread = 200;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..per_thread {
                    logger
                        .info(format!("thread {} message {} {}", t, i, "x".repeat(64)))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    logger.flush().unwrap();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), threads * per_thread);

    let formatter = DefaultFormatter::new().with_timestamp_format(TimestampFormat::Iso8601Micros);
    let mut previous = None;
    for line in &lines {
        let parsed = formatter.parse_line(line).expect("Interleaved or malformed line");
        assert_eq!(parsed.level, LogLevel::Info);
        assert!(parsed.message.ends_with(&"x".repeat(64)));

        let stamp = formatter
            .timestamp_format()
            .parse(&parsed.timestamp)
            .expect("Unparseable timestamp");
        if let Some(prev) = previous {
            assert!(prev <= stamp, "Timestamps went backwards");
        }
        previous = Some(stamp);
    }
}

#[test]
fn test_async_single_producer_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("async_order.log");

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .emitter(StreamEmitter::new(BufWriter::new(open_append(&log_file))))
        .async_mode(4, Some(64))
        .build()
        .expect("Failed to build logger");

    for i in 0..1000 {
        logger.debug(format!("Message {}", i)).unwrap();
    }
    logger.shutdown().expect("Shutdown failed");

    let formatter = DefaultFormatter::new();
    let messages: Vec<String> = read_lines(&log_file)
        .iter()
        .map(|line| formatter.parse_line(line).unwrap().message)
        .collect();
    let expected: Vec<String> = (0..1000).map(|i| format!("Message {}", i)).collect();
    assert_eq!(messages, expected);
    assert_eq!(logger.metrics().emitted_count(), 1000);
}

#[test]
fn test_async_multi_producer_subsequences() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("async_multi.log");

    let logger = Arc::new(
        Logger::builder()
            .emitter(FileEmitter::new(open_append(&log_file)))
            .async_mode(3, None)
            .build()
            .expect("Failed to build logger"),
    );

    let producers = 6;
    let per_producer = 300;
    let handles: Vec<_> = (0..producers)
        .map(|p| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..per_producer {
                    logger.info(format!("{}/{}", p, i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    logger.shutdown().unwrap();

    let formatter = DefaultFormatter::new();
    let messages: Vec<String> = read_lines(&log_file)
        .iter()
        .map(|line| formatter.parse_line(line).unwrap().message)
        .collect();
    assert_eq!(messages.len(), producers * per_producer);

    for p in 0..producers {
        let prefix = format!("{}/", p);
        let sequence: Vec<usize> = messages
            .iter()
            .filter_map(|m| m.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(sequence, (0..per_producer).collect::<Vec<_>>());
    }
}

#[test]
fn test_level_filter_drops_below_minimum() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("filter.log");

    let logger = Logger::builder()
        .min_level(LogLevel::Warning)
        .emitter(
            StreamEmitter::new(open_append(&log_file)).with_flush_policy(FlushPolicy::EveryRecord),
        )
        .build()
        .unwrap();

    logger.debug("debug message").unwrap();
    logger.error("error message").unwrap();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[ERROR]"));
    assert!(lines[0].ends_with(" error message"));
}

#[test]
fn test_macros_and_methods_round_trip_location() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("location.log");

    let logger = Logger::builder()
        .emitter(
            StreamEmitter::new(open_append(&log_file)).with_flush_policy(FlushPolicy::EveryRecord),
        )
        .build()
        .unwrap();

    let method_line = line!() + 1;
    logger.warning("from method").unwrap();
    let macro_line = line!() + 1;
    info!(logger, "from macro {}", 2).unwrap();
    warning!(logger, "filtered? {}", false).unwrap();

    let formatter = DefaultFormatter::new();
    let parsed: Vec<_> = read_lines(&log_file)
        .iter()
        .map(|line| formatter.parse_line(line).unwrap())
        .collect();
    assert_eq!(parsed.len(), 3);

    assert_eq!(parsed[0].scope.as_deref(), Some(file!()));
    assert_eq!(parsed[0].line, Some(method_line));

    assert_eq!(parsed[1].level, LogLevel::Info);
    assert_eq!(parsed[1].scope.as_deref(), Some(module_path!()));
    assert_eq!(parsed[1].line, Some(macro_line));
    assert_eq!(parsed[1].message, "from macro 2");
}

#[test]
fn test_builder_configuration_errors() {
    assert!(matches!(
        Logger::builder().build(),
        Err(LoggerError::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        Logger::builder()
            .emitter(StreamEmitter::new(std::io::sink()))
            .async_mode(2, Some(0))
            .build(),
        Err(LoggerError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_config_file_drives_builder() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("configured.log");

    let config: LoggerConfig = serde_json::from_str(
        r#"{
            "min_level": "Info",
            "strategy": { "async": { "workers": 2, "queue_bound": 128 } },
            "timestamp_format": "UnixMillis",
            "include_location": false
        }"#,
    )
    .expect("Failed to parse config");
    config.validate().unwrap();

    let logger = LoggerBuilder::from_config(&config)
        .emitter(FileEmitter::new(open_append(&log_file)))
        .build()
        .unwrap();
    assert_eq!(logger.strategy_name(), "async");

    logger.debug("hidden").unwrap();
    logger.info("shown").unwrap();
    logger.shutdown().unwrap();

    let formatter = DefaultFormatter::new()
        .with_timestamp_format(TimestampFormat::UnixMillis)
        .with_include_location(false);
    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    let parsed = formatter.parse_line(&lines[0]).unwrap();
    assert_eq!(parsed.message, "shown");
    assert!(formatter.timestamp_format().parse(&parsed.timestamp).is_some());
}

#[test]
fn test_timestamp_formats_render() {
    let formats = [
        TimestampFormat::Iso8601,
        TimestampFormat::Iso8601Micros,
        TimestampFormat::Rfc3339,
        TimestampFormat::Unix,
        TimestampFormat::UnixMillis,
        TimestampFormat::UnixMicros,
    ];

    for format in formats {
        let (emitter, sink) = MemoryEmitter::new();
        let logger = Logger::builder()
            .timestamp_format(format.clone())
            .emitter(emitter)
            .build()
            .unwrap();
        logger.info("stamped").unwrap();

        let formatter = DefaultFormatter::new().with_timestamp_format(format.clone());
        let parsed = formatter.parse_line(&sink.lines()[0]).unwrap();
        assert!(
            format.parse(&parsed.timestamp).is_some(),
            "{:?} did not round-trip",
            format
        );
    }
}
