//! Logging setup
//!
//! Initialises the tracing subscriber from the `[main]` config section.
//! The sink is stderr by default; with `main.log` set it is a file whose
//! handle can be reopened in place, so logrotate can move the file and
//! send SIGHUP to get a fresh one.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::MainConfig;

/// Shared handle to a log file that can be reopened without restarting.
#[derive(Clone)]
pub struct ReopenableLog {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl ReopenableLog {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = open_log_file(&path)?;
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Open the configured path again and swap the handle in place.
    pub fn reopen(&self) -> io::Result<()> {
        let file = open_log_file(&self.path)?;
        *self.file.lock().unwrap() = file;
        Ok(())
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .mode(0o644)
        .open(path)
}

/// Writer handed to the subscriber; every write goes through the shared,
/// swappable file handle.
pub struct LogWriter(Arc<Mutex<File>>);

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

impl<'a> MakeWriter<'a> for ReopenableLog {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(Arc::clone(&self.file))
    }
}

/// Initialise the global subscriber.
///
/// Returns the reopenable handle when logging to a file so the caller can
/// wire up the SIGHUP listener.
pub fn init(config: &MainConfig) -> Option<ReopenableLog> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("metricsearch={}", level_directive(&config.log_level))),
    );

    if config.log.is_empty() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return None;
    }

    match ReopenableLog::open(&config.log) {
        Ok(log) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(log.clone()),
                )
                .init();
            Some(log)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
            tracing::warn!("cannot open log file '{}': {e}; logging to stderr", config.log);
            None
        }
    }
}

/// Map a configured level name onto a tracing directive.
///
/// `notice` and `critical` are accepted for compatibility with existing
/// config files and map to their nearest levels.
pub fn level_directive(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "info" | "notice" => "info",
        "warning" | "warn" => "warn",
        "error" | "critical" => "error",
        _ => "debug",
    }
}

/// Reopen the log file every time SIGHUP arrives.
pub fn spawn_hup_listener(log: ReopenableLog) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut hup = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
        {
            Ok(hup) => hup,
            Err(e) => {
                tracing::error!("failed to install SIGHUP handler: {e}");
                return;
            }
        };
        while hup.recv().await.is_some() {
            tracing::debug!("HUP signal caught, reopening log file");
            if let Err(e) = log.reopen() {
                tracing::error!("failed to reopen log file: {e}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_level_directive_mapping() {
        assert_eq!(level_directive("trace"), "trace");
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("notice"), "info");
        assert_eq!(level_directive("warning"), "warn");
        assert_eq!(level_directive("error"), "error");
        assert_eq!(level_directive("critical"), "error");
        assert_eq!(level_directive("bogus"), "debug");
    }

    #[test]
    fn test_reopen_switches_to_fresh_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("service.log");

        let log = ReopenableLog::open(&path).unwrap();
        log.make_writer().write_all(b"before rotate\n").unwrap();

        // simulate logrotate: move the file away, then HUP
        let rotated = dir.path().join("service.log.1");
        std::fs::rename(&path, &rotated).unwrap();
        log.reopen().unwrap();
        log.make_writer().write_all(b"after rotate\n").unwrap();

        assert_eq!(std::fs::read_to_string(&rotated).unwrap(), "before rotate\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after rotate\n");
    }
}
