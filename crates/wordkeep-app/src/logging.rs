//! Structured logging to a file.
//!
//! The terminal is in raw mode while the game runs, so log lines go to a
//! file instead of stderr. Filtering follows `RUST_LOG`, falling back to
//! [`DEFAULT_FILTER`]. Initialization is idempotent; the first call wins.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Directive prefixes cover every `wordkeep*` crate.
pub const DEFAULT_FILTER: &str = "wordkeep=info";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, appending to `path`.
pub fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .compact();

        let _ = subscriber.try_init();
    });
    Ok(())
}
