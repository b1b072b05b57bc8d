//! HTTP handlers
//!
//! Thin plain-text adapters over the metric tree:
//!
//! - `GET /search?query=<pattern>` — matched names, one per line
//! - `GET|POST /add?name=<metric>` — index one metric
//! - `GET /dump` — full depth-first dump of the tree
//! - `GET /stats` — human-readable counters
//! - `GET /debug/stack` — captured backtrace

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: String,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    state.stats.count_search();

    let started = Instant::now();
    let results = state.tree.search(&params.query);
    let elapsed = started.elapsed();
    if elapsed > Duration::from_millis(1) {
        tracing::debug!(query = %params.query, ?elapsed, "slow search");
    }

    let mut body = String::new();
    for item in results {
        body.push_str(&item);
        body.push('\n');
    }
    body.into_response()
}

#[derive(Debug, Deserialize)]
pub struct AddParams {
    #[serde(default)]
    name: String,
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddParams>,
) -> Response {
    state.stats.count_add();

    if params.name.is_empty() {
        return (StatusCode::BAD_REQUEST, "Specify 'name' parameter").into_response();
    }

    let started = Instant::now();
    state.tree.add(&params.name).await;
    let elapsed = started.elapsed();
    if elapsed > Duration::from_millis(100) {
        tracing::debug!(metric = %params.name, ?elapsed, "slow add");
    }

    "Ok".into_response()
}

pub async fn dump(State(state): State<Arc<AppState>>) -> Response {
    state.stats.count_dump();

    let tree = Arc::clone(&state.tree);
    let body = tokio::task::spawn_blocking(move || {
        let mut out = Vec::new();
        if let Err(e) = tree.dump(&mut out) {
            tracing::error!("dump error: {e}");
        }
        out
    })
    .await
    .unwrap_or_default();

    String::from_utf8_lossy(&body).into_owned().into_response()
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Response {
    let totals = state.stats.totals();
    let rps = state.stats.rps();

    let mut out = String::new();
    out.push_str("Total requests (online):\n=============================\n");
    out.push_str(&format!("  add:    {}\n", totals.add));
    out.push_str(&format!("  search: {}\n", totals.search));
    out.push_str(&format!("  dump:   {}\n", totals.dump));
    out.push('\n');
    out.push_str("RPS (refreshes every minute):\n=============================\n");
    out.push_str(&format!("  add:    {:.3}\n", rps.add));
    out.push_str(&format!("  search: {:.3}\n", rps.search));
    out.push_str(&format!("  dump:   {:.3}\n", rps.dump));
    out.push('\n');
    out.push_str(&format!("Total Metrics: {}\n", state.tree.total_metrics()));
    out.push_str(&format!("Sync Queue Size: {}\n", state.tree.sync_queue_size()));

    out.into_response()
}

pub async fn debug_stack() -> Response {
    std::backtrace::Backtrace::force_capture()
        .to_string()
        .into_response()
}
