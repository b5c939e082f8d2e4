//! Process-wide logger
//!
//! Code that can take a [`Logger`] explicitly should. This accessor is for
//! the places that cannot, such as library glue or panic hooks.
//!
//! The slot starts empty. The first [`logger`] call that sees it empty builds
//! the default logger and publishes it. Threads racing on that first access
//! may each build one; the last store wins and every later reader sees the
//! winner. A reader never observes a half-built logger.

use crate::core::Logger;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

static GLOBAL: ArcSwapOption<Logger> = ArcSwapOption::const_empty();

/// The process-wide logger, built on first use.
///
/// The default is the production logger, or the development logger when the
/// crate is built with the `development` feature.
pub fn logger() -> Arc<Logger> {
    if let Some(current) = GLOBAL.load_full() {
        return current;
    }

    let fresh = Arc::new(default_logger());
    GLOBAL.store(Some(Arc::clone(&fresh)));
    fresh
}

/// Publish `logger` as the process-wide logger, returning the previous one.
pub fn replace(logger: Logger) -> Option<Arc<Logger>> {
    GLOBAL.swap(Some(Arc::new(logger)))
}

/// Whether a process-wide logger has been published yet.
pub fn is_initialized() -> bool {
    GLOBAL.load().is_some()
}

fn default_logger() -> Logger {
    if cfg!(feature = "development") {
        Logger::development()
    } else {
        Logger::new()
    }
}
