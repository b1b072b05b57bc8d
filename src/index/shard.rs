//! Per-shard durability pipeline
//!
//! Every first-level token owns one background appender task fed by a
//! bounded channel. The task holds the only handle to
//! `<indexDir>/<firstToken>.idx`, so appends never need file locking and
//! per-shard submission order is preserved. A full channel pushes back on
//! the caller, which is the admission-control valve for write bursts.
//!
//! A failed append is logged and the record dropped; the worker keeps
//! consuming. Workers live until their channel closes, which only happens
//! when the tree is dropped.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to one shard's background appender.
#[derive(Debug)]
pub(crate) struct ShardWriter {
    tx: mpsc::Sender<String>,
    _task: JoinHandle<()>,
}

impl ShardWriter {
    /// Spawn the appender task for `first_token` and return its handle.
    ///
    /// `capacity` below 1 is clamped — bounded channels need room for at
    /// least one record.
    pub fn spawn(index_dir: &Path, first_token: &str, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let path = index_dir.join(format!("{first_token}.idx"));
        let task = tokio::spawn(append_loop(path, rx));
        Self { tx, _task: task }
    }

    /// A sender for enqueuing tails on this shard.
    pub fn sender(&self) -> mpsc::Sender<String> {
        self.tx.clone()
    }

    /// Number of tails currently waiting in this writer's channel.
    pub fn queued(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
}

async fn append_loop(path: PathBuf, mut rx: mpsc::Receiver<String>) {
    let mut file = match open_shard(&path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(path = %path.display(), "error opening shard file for append: {e}");
            return;
        }
    };
    tracing::debug!(path = %path.display(), "shard writer started");

    while let Some(tail) = rx.recv().await {
        if tail.is_empty() {
            continue;
        }
        let mut record = tail;
        record.push('\n');
        if let Err(e) = file.write_all(record.as_bytes()).await {
            tracing::error!(path = %path.display(), "index update error: {e}");
        }
    }
}

async fn open_shard(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .mode(0o644)
        .open(path)
        .await
}
