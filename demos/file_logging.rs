//! File logging example
//!
//! Builds a logger from a JSON configuration that writes to a file, then
//! reads the records back.
//!
//! Run with: cargo run --example file_logging

use rust_logger_facade::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Logger Facade - File Logging Example ===\n");

    let path = std::env::temp_dir().join("rust_logger_facade_demo.log");
    let _ = std::fs::remove_file(&path);

    let config = LoggerConfig::from_json(&format!(
        r#"{{
            "level": "debug",
            "output": {{ "file": {} }},
            "encoder": {{ "time_format": "unix_millis" }}
        }}"#,
        serde_json::to_string(&path.display().to_string())?
    ))?;
    let logger = config.build()?.named("app");

    println!("1. Writing to {}", path.display());
    logger.infow("application started", kv!["version", "0.1.0"]);
    logger.debugw("loading configuration", kv![common_fields::file("app.json")]);
    logger.warnw("using default settings", kv!["missing", "cache.size"]);
    logger.errorw("plugin failed", kv![common_fields::error(&"not found")]);
    logger.sync()?;

    println!("\n2. Records read back:");
    let content = std::fs::read_to_string(&path).map_err(LoggerError::from)?;
    for line in content.lines() {
        let record: serde_json::Value = serde_json::from_str(line)?;
        println!(
            "   {:>5}  {}",
            record["level"].as_str().unwrap_or("?"),
            record["message"].as_str().unwrap_or("?")
        );
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
