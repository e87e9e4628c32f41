//! Tracing setup.
//!
//! dropslot's own events follow `logging.level`. The HTTP client and server
//! internals are held at `warn`, and the per-request spans from the trace
//! layer only appear with `logging.access_log`. A `RUST_LOG` variable
//! replaces all of this.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Dependencies that are chatty at `info` and below.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "h2", "reqwest", "rustls"];

/// Normalize a configured level. Unknown values mean `info`.
fn level_name(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Filter directives for `config`.
fn directives(config: &LoggingConfig) -> String {
    let mut directives = vec![level_name(&config.level).to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));

    // TraceLayer emits its request spans and events at debug.
    let access = if config.access_log { "debug" } else { "warn" };
    directives.push(format!("tower_http={access}"));

    directives.join(",")
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(config)))
}

/// Initialize logging to stdout and, when `config.file` is non-empty, to
/// that file as well. The file is appended to across restarts.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if config.file.is_empty() {
        init_console_only(config);
        return Ok(());
    }

    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;
    let writer = std::io::stdout.and(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(config))
        .init();

    Ok(())
}

/// Console-only logging, used when the log file cannot be opened.
pub fn init_console_only(config: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true),
        )
        .with(build_filter(config))
        .init();
}
