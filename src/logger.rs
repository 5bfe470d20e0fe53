//! Logging setup for allocation runs

use chrono::Local;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy)]
struct RunTimer;

impl FormatTime for RunTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%m%dT%H:%M:%S%.3f"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info` or `info,fleetalloc=debug`
    pub level: String,
    /// Log file name inside the run directory. No file output when unset.
    pub file: Option<String>,
    /// Let `RUST_LOG` take precedence over `level`
    pub env_override: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("run.log".to_string()),
            env_override: true,
        }
    }
}

impl LogConfig {
    pub fn stdout_only(level: &str) -> Self {
        Self {
            level: level.to_string(),
            file: None,
            env_override: true,
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.env_override
            && let Ok(filter) = EnvFilter::try_from_default_env()
        {
            return filter;
        }
        EnvFilter::new(&self.level)
    }
}

/// Keeps the background file writer alive; drop it last or buffered lines
/// are lost.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
    pub path: Option<PathBuf>,
}

/// Install the global subscriber: stdout always, plus a plain-text file in
/// `dir` when `config.file` is set.
pub fn init(config: &LogConfig, dir: &Path) -> Result<LogGuard, Box<dyn std::error::Error>> {
    let (file_layer, guard, path) = match &config.file {
        Some(name) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(name);
            let (writer, guard) = tracing_appender::non_blocking(std::fs::File::create(&path)?);
            let layer = tracing_subscriber::fmt::layer()
                .with_timer(RunTimer)
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(config.filter());
            (Some(layer), Some(guard), Some(path))
        }
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(RunTimer)
                .with_writer(std::io::stdout)
                .with_filter(config.filter()),
        )
        .with(file_layer)
        .try_init()?;

    Ok(LogGuard { _file: guard, path })
}
