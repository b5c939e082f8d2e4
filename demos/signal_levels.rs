//! Runtime level changes from OS signals
//!
//! SIGUSR1 raises the threshold to Error, SIGUSR2 lowers it to Debug.
//! The named child shares the gate, so one change retunes both loggers.
//! Ctrl-C exits.
//!
//! Run with: cargo run --example signal_levels
//! Then from another shell: kill -USR2 <pid>

#[cfg(unix)]
#[tokio::main]
async fn main() -> rust_logger_facade::Result<()> {
    use rust_logger_facade::prelude::*;
    use std::time::Duration;
    use tokio::signal::unix::{signal, SignalKind};

    let logger = Logger::builder()
        .encoding(Encoding::Console)
        .sink(StdoutSink::new())
        .build()
        .named("signals");
    let level = logger.atomic_level();
    let worker = logger.named("worker");

    let mut usr1 = signal(SignalKind::user_defined1())?;
    let mut usr2 = signal(SignalKind::user_defined2())?;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    logger.infow("waiting for signals", kv!["pid", std::process::id()]);

    let mut tick = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tick += 1;
                logger.debugw("tick", kv!["n", tick]);
                logger.infow("heartbeat", kv!["n", tick]);
                logger.errorw("still alive", kv!["n", tick]);
                worker.debugw("polling queue", kv!["n", tick]);
                worker.infow("batch done", kv!["n", tick]);
            }
            _ = usr1.recv() => {
                level.set_level(Level::Error);
                logger.errorw("level changed", kv!["threshold", "error"]);
            }
            _ = usr2.recv() => {
                level.set_level(Level::Debug);
                logger.infow("level changed", kv!["threshold", "debug"]);
            }
            _ = tokio::signal::ctrl_c() => {
                logger.infow("shutting down", kv![]);
                break;
            }
        }
    }

    logger.sync()
}

#[cfg(not(unix))]
fn main() {
    eprintln!("signal_levels needs a Unix platform");
}
