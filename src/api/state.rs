//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;

use crate::api::stats::{monitor_prefix, RequestStats};
use crate::config::MainConfig;
use crate::index::MetricTree;

/// Shared application state for all handlers
pub struct AppState {
    /// The metric index served by this process
    pub tree: Arc<MetricTree>,
    /// Process-wide request counters
    pub stats: RequestStats,
    /// Ship counters to the telemetry endpoint once per minute
    pub self_monitor: bool,
    /// Prefix for self-monitoring metric names
    pub monitor_prefix: String,
}

impl AppState {
    pub fn new(tree: Arc<MetricTree>, config: &MainConfig) -> Self {
        Self {
            tree,
            stats: RequestStats::new(),
            self_monitor: config.self_monitor,
            monitor_prefix: monitor_prefix(&config.self_monitor_prefix),
        }
    }
}
