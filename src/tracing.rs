//! Tracing initialization.
//!
//! Console output goes to stderr (stdout carries the tool-server protocol) with
//! colour and timestamps. When a log file is configured, the same events are
//! also appended there without colour.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Once};
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times.
pub fn init(log_file: Option<&Path>) {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = || {
            EnvFilter::from_default_env().add_directive(
                if is_test {
                    tracing::Level::DEBUG
                } else {
                    tracing::Level::INFO
                }
                .into(),
            )
        };

        if is_test {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_test_writer()
                .try_init();
            return;
        }

        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .compact()
            .with_filter(filter());

        let file = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => Some(
                    fmt::layer()
                        .with_writer(Arc::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_filter(filter()),
                ),
                Err(e) => {
                    eprintln!("Failed to open log file {}: {}", path.display(), e);
                    None
                }
            }
        });

        if let Err(e) = tracing_subscriber::registry()
            .with(console)
            .with(file)
            .try_init()
        {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}
