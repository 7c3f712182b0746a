// File logging
//
// stdout belongs to the TUI and stderr carries the OSC color sequences, so
// logs only ever go to a file.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub const LOG_FILE: &str = "tintweak.log";

/// Install the global subscriber when file logging is enabled.
///
/// The returned guard flushes the background writer on drop; keep it alive
/// until the program exits.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    if !config.enabled {
        return Ok(None);
    }

    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("couldn't create log directory {}", config.dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level {:?}", config.level))?;

    let appender = tracing_appender::rolling::never(&config.dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("couldn't install log subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_installs_nothing() {
        let config = LoggingConfig {
            enabled: false,
            level: "not a level ((".to_string(),
            dir: "/nonexistent/tintweak".into(),
        };
        assert!(init(&config).unwrap().is_none());
    }
}
