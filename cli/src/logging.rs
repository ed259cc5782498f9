use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber: `RUST_LOG`-driven stderr output and, when
/// `log_file` is set, a second non-blocking writer to that file. The returned
/// guard must be kept alive until exit so buffered lines are flushed.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter());

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(stderr_layer).try_init()?;
        return Ok(None);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter());

    tracing_subscriber::registry().with(stderr_layer).with(file_layer).try_init()?;
    Ok(Some(guard))
}
