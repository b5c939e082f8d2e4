//! Stress tests for concurrent use of one logger
//!
//! These tests verify:
//! - Concurrent writers never interleave bytes within a record
//! - Level changes are observed by every thread without tearing
//! - Child loggers can be derived and used from many threads at once
//! - Racing first accesses to the process-wide logger settle on one instance

use rust_logger_facade::{global, observer};
use rust_logger_facade::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

/// Every line written by concurrent threads must be a complete JSON record.
#[test]
fn test_concurrent_writes_produce_whole_lines() {
    let buffer = BufferSink::new();
    let logger = Logger::builder()
        .sink(buffer.clone())
        .add_caller(false)
        .build();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.named(&format!("worker{}", t));
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    logger.infow("tick", kv!["thread", t, "seq", i, "payload", "x".repeat(64)]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let lines = buffer.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    for line in &lines {
        let json: serde_json::Value =
            serde_json::from_str(line).unwrap_or_else(|e| panic!("torn record {:?}: {}", line, e));
        assert_eq!(json["message"], "tick");
    }
    assert_eq!(logger.metrics().records_written(), (THREADS * PER_THREAD) as u64);
}

/// Flipping the shared gate while other threads log must never lose or
/// invent records at levels that are always enabled.
#[test]
fn test_set_level_while_logging() {
    let (logger, logs) = observer::new_logger(Level::Info);
    let stop = Arc::new(AtomicBool::new(false));

    let toggler = {
        let logger = logger.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut flips = 0u32;
            while !stop.load(Ordering::Relaxed) {
                let next = if flips % 2 == 0 { Level::Debug } else { Level::Warn };
                logger.set_level(next);
                flips += 1;
                thread::yield_now();
            }
        })
    };

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let logger = logger.with(&[Field::bool("writer", true)]);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    logger.debugw("maybe", kv![]);
                    logger.warnw("always", kv![]);
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer panicked");
    }
    stop.store(true, Ordering::Relaxed);
    toggler.join().expect("toggler panicked");

    assert_eq!(logs.filter_message("always").len(), 4 * PER_THREAD);
    assert!(logs.filter_message("maybe").len() <= 4 * PER_THREAD);
    assert!(matches!(logger.level(), Level::Debug | Level::Warn));
}

/// Many threads hitting a file sink at once still produce one record per line.
#[test]
fn test_concurrent_file_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");
    let logger = Logger::builder()
        .sink(FileSink::new(&log_file).expect("Failed to open sink"))
        .build();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let logger = &logger;
            scope.spawn(move || {
                for i in 0..50 {
                    logger.warnw("disk", kv!["thread", t, "i", i, "orphan"]);
                }
            });
        }
    });
    logger.sync().expect("Failed to sync");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    // Each call writes one diagnostic plus the record itself.
    assert_eq!(content.lines().count(), THREADS * 50 * 2);
    assert_eq!(logger.metrics().diagnostics(), (THREADS * 50) as u64);
    assert_eq!(logger.metrics().write_failures(), 0);
}

/// Threads racing on the first `global::logger()` call may each build a
/// logger, but once they are done every reader sees the same one.
#[test]
fn test_global_first_access_race() {
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let logger = global::logger();
                logger.debugw("below the default threshold", kv![]);
                logger.level()
            })
        })
        .collect();

    for handle in handles {
        let level = handle.join().expect("reader panicked");
        assert!(matches!(level, Level::Info | Level::Debug));
    }

    assert!(global::is_initialized());
    assert!(Arc::ptr_eq(&global::logger(), &global::logger()));
}
