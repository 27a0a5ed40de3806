//! Logging setup for binaries built on this crate.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the application. [`init`] installs a compact stderr formatter filtered
//! by `RUST_LOG`, falling back to the given default level.

use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Timestamp format used in log lines.
const TIME_FORMAT: &str = "[hour]:[minute]:[second].[subsecond digits:3]";

/// Installs the global subscriber.
///
/// `default_level` is used when `RUST_LOG` is unset or invalid. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let result = match time::format_description::parse_owned::<2>(TIME_FORMAT) {
        Ok(format) => builder.with_timer(LocalTime::new(format)).try_init(),
        Err(_) => builder.try_init(),
    };
    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

/// Maps a `-v` count to a default filter level.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
