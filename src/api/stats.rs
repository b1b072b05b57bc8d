//! Request statistics
//!
//! Process-wide request counters plus the once-per-minute RPS
//! recalculator. When self-monitoring is enabled the recalculator also
//! ships the counters to the local telemetry endpoint in Graphite
//! plaintext format.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use crate::api::state::AppState;

/// Telemetry endpoint for self-monitoring.
pub const MONITOR_ADDR: &str = "127.0.0.1:42000";

/// Per-handler request counters with a windowed RPS snapshot.
#[derive(Debug, Default)]
pub struct RequestStats {
    add: AtomicU64,
    search: AtomicU64,
    dump: AtomicU64,
    last: Mutex<Totals>,
    rps: Mutex<Rps>,
}

/// Totals at one point in time.
#[derive(Debug, Default, Clone, Copy)]
pub struct Totals {
    pub add: u64,
    pub search: u64,
    pub dump: u64,
}

/// Requests per second over the last recalculation window.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rps {
    pub add: f64,
    pub search: f64,
    pub dump: f64,
}

impl RequestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_add(&self) {
        self.add.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_search(&self) {
        self.search.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_dump(&self) {
        self.dump.fetch_add(1, Ordering::Relaxed);
    }

    pub fn totals(&self) -> Totals {
        Totals {
            add: self.add.load(Ordering::Relaxed),
            search: self.search.load(Ordering::Relaxed),
            dump: self.dump.load(Ordering::Relaxed),
        }
    }

    pub fn rps(&self) -> Rps {
        *self.rps.lock().unwrap()
    }

    /// Recompute RPS from the totals seen since the previous call.
    pub fn recalc_rps(&self, window_secs: f64) {
        let now = self.totals();
        let mut last = self.last.lock().unwrap();
        let rps = Rps {
            add: (now.add - last.add) as f64 / window_secs,
            search: (now.search - last.search) as f64 / window_secs,
            dump: (now.dump - last.dump) as f64 / window_secs,
        };
        *last = now;
        *self.rps.lock().unwrap() = rps;
    }
}

/// Resolve the prefix used for self-monitoring metric names.
///
/// An explicitly configured prefix wins (minus any trailing dot);
/// otherwise the hostname with dots replaced by underscores.
pub fn monitor_prefix(configured: &str) -> String {
    if !configured.is_empty() {
        return configured.trim_end_matches('.').to_string();
    }
    std::env::var("HOSTNAME")
        .unwrap_or_else(|_| "localhost".to_string())
        .replace('.', "_")
}

/// Background task recomputing RPS once per minute and, when enabled,
/// shipping counters to the telemetry endpoint.
pub fn spawn_rps_recalc(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        // consume the immediate first tick so the first window is a real minute
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.stats.recalc_rps(60.0);
            if state.self_monitor {
                if let Err(e) = send_metrics(&state).await {
                    tracing::debug!("self-monitor send failed: {e}");
                }
            }
        }
    })
}

async fn send_metrics(state: &AppState) -> std::io::Result<()> {
    let mut conn = TcpStream::connect(MONITOR_ADDR).await?;

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let payload = monitor_payload(state, ts);
    conn.write_all(payload.as_bytes()).await
}

fn monitor_payload(state: &AppState, ts: u64) -> String {
    let totals = state.stats.totals();
    let rps = state.stats.rps();
    let prefix = &state.monitor_prefix;

    let mut out = String::new();
    let _ = writeln!(out, "{prefix}.metricsearch.rps.add {:.4} {ts}", rps.add);
    let _ = writeln!(out, "{prefix}.metricsearch.rps.search {:.4} {ts}", rps.search);
    let _ = writeln!(out, "{prefix}.metricsearch.rps.dump {:.4} {ts}", rps.dump);
    let _ = writeln!(out, "{prefix}.metricsearch.reqs.add {:.2} {ts}", totals.add as f64);
    let _ = writeln!(out, "{prefix}.metricsearch.reqs.search {:.2} {ts}", totals.search as f64);
    let _ = writeln!(out, "{prefix}.metricsearch.reqs.dump {:.2} {ts}", totals.dump as f64);
    let _ = writeln!(
        out,
        "{prefix}.metricsearch.metrics {:.2} {ts}",
        state.tree.total_metrics() as f64
    );
    let _ = writeln!(
        out,
        "{prefix}.metricsearch.sync_queue {:.2} {ts}",
        state.tree.sync_queue_size() as f64
    );
    out
}
