//! Logging setup.
//!
//! The library only emits `tracing` events; a subscriber is installed by the
//! binary (or by tests that want to see the events).

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set (e.g. `RUST_LOG=horario=debug`); otherwise the
/// level is `info`, or `debug` when `verbose`.
///
/// ```no_run
/// horario::logging::init(false);
/// ```
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber writing through the test harness.
/// Safe to call from several tests.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
