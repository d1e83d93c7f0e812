pub mod app;
pub mod error;
pub mod generators;
pub mod maze;
pub mod session;
pub mod solvers;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

/// Env var selecting the log level (`error`, `warn`, `info`, `debug` or `trace`).
pub const LOG_LEVEL_ENV: &str = "MAZERUN_LOG";
/// Env var holding a `u64` seed for maze generation.
pub const SEED_ENV: &str = "MAZERUN_SEED";

/// Sends tracing output to `mazerun.log` in the working directory so it never draws over
/// the terminal UI. Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logging() -> WorkerGuard {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        ".",
        "mazerun.log",
    ));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    guard
}

/// Seed from [`SEED_ENV`], if set to a valid number.
pub fn seed_from_env() -> Option<u64> {
    let raw = std::env::var(SEED_ENV).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(_) => {
            tracing::warn!("[config] ignoring invalid {}={:?}", SEED_ENV, raw);
            None
        }
    }
}
