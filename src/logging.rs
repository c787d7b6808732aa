//! Tracing subscriber setup

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file written while the full-screen form is active
pub const LOG_FILE_NAME: &str = "claimfiler.log";

/// Maps the number of `-v` flags to a default filter
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logs to stderr. `RUST_LOG` overrides `level`.
pub fn init_stderr(level: &str) {
    tracing_subscriber::registry()
        .with(filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();
}

/// Logs to `dir/claimfiler.log` so output never lands on the terminal UI.
///
/// Falls back to discarding log output when the file cannot be opened and
/// returns the error for the caller to report.
pub fn init_file(level: &str, dir: &Path) -> io::Result<()> {
    let opened = fs::create_dir_all(dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE_NAME))
    });

    let registry = tracing_subscriber::registry().with(filter(level));
    match opened {
        Ok(file) => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
            Ok(())
        }
        Err(e) => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(io::sink))
                .init();
            Err(e)
        }
    }
}
