//! Basic logger usage example
//!
//! Demonstrates the three call styles, child loggers and what happens to
//! malformed key/value lists.
//!
//! Run with: cargo run --example basic_usage

use rust_logger_facade::prelude::*;
use rust_logger_facade::{global, info};

fn main() -> Result<()> {
    println!("=== Rust Logger Facade - Basic Usage Example ===\n");

    let logger = LoggerBuilder::for_development()
        .sink(StdoutSink::new())
        .build();

    println!("1. Keyed calls with typed fields and loose pairs:");
    logger.debugw("loading configuration", kv![common_fields::file("/etc/app.json")]);
    logger.infow("listening", kv!["port", 8080, "tls", true]);
    info!(logger, "macro form", "workers", 4);

    println!("\n2. Context calls add a traceId field:");
    let ctx = TracingContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
    logger.info(&ctx, "request served", kv!["status", 200]);
    logger.info(&TracingContext::empty(), "no trace in scope", kv![]);

    println!("\n3. Child loggers:");
    let db = logger.named("db").with(&[Field::string("cluster", "primary")]);
    db.warnw("slow query", kv![common_fields::query("select 1"), "ms", 850]);

    println!("\n4. Malformed pairs are reported, never fatal:");
    logger.infow("odd list", kv!["key_without_value"]);
    logger.infow("bad key", kv![42, "value"]);

    println!("\n5. Raising the threshold hides Debug and Info:");
    logger.set_level(Level::Warn);
    logger.debugw("hidden", kv![]);
    logger.infow("hidden", kv![]);
    logger.warnw("visible", kv![]);

    println!("\n6. The process-wide logger:");
    global::replace(Logger::builder().sink(StdoutSink::new()).build());
    global::logger().infow("from anywhere", kv!["json", true]);

    logger.sync()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
