//! Tracing subscriber setup for the console binaries.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs to a daily-rolling file so output does not interleave with the prompt.
///
/// The returned guard must be kept alive for the lifetime of the program;
/// dropping it flushes and stops the writer.
pub fn init_file_logging(
    logs_dir: &Path,
    file_prefix: &str,
    default_level: &str,
) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;
    let appender = tracing_appender::rolling::daily(logs_dir, file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // A second init (e.g. in tests) is not an error worth failing on
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}

/// Logs to stderr, keeping stdout free for command output.
pub fn init_stderr_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
