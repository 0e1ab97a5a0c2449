//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The terminal is owned by the UI, so log output goes to a file when one is
//! configured and is discarded otherwise. `RUST_LOG` overrides the level picked
//! on the command line.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub(crate) struct LogConfig {
    /// Default level when `RUST_LOG` is not set.
    pub level_filter: LevelFilter,
    /// Optional log file path.
    pub log_file: Option<PathBuf>,
}

/// Install the global subscriber. Call once at startup.
pub(crate) fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::sink);
    }
    Ok(())
}

fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(config.level_filter))
        .with(layer)
        .init();
}

fn build_env_filter(level_filter: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy()
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<File>>,
}

impl SharedFileWriter {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_poisoned| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_poisoned| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'writer> MakeWriter<'writer> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'writer self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}
