//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::defaults::DEFAULT_LOG_FILTER;

static INIT: Once = Once::new();

/// Initialize the client's tracing/logging system.
///
/// Reads the `ICLOUD_LOG` environment variable for per-module log levels.
/// Format: `ICLOUD_LOG=icloud_client::session=debug,icloud_client=info`
///
/// Falls back to `icloud_core=info,icloud_client=info` if `ICLOUD_LOG` is not
/// set or is invalid. Safe to call more than once; only the first call
/// installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ICLOUD_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // Another subscriber may already be installed by the host application.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .with(filter)
            .try_init();
    });
}

/// Like [`init_tracing`], but emits one JSON object per event.
pub fn init_json_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ICLOUD_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(true))
            .with(filter)
            .try_init();
    });
}
