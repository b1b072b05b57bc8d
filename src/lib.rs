//! # metricsearch
//!
//! In-memory search index for hierarchical, dot-delimited metric names
//! (`host.cpu.idle`). Names stream in continuously, live in a token trie
//! and are queried with glob patterns (`*`, `?`, `[...]`). The index
//! persists itself as one plain-text shard file per top-level token so a
//! restart can rebuild it without external storage.
//!
//! ## Modules
//!
//! - [`index`]: the token trie, glob matcher and per-shard durability pipeline
//! - [`api`]: HTTP front end with Axum
//! - [`config`]: TOML configuration
//! - [`logging`]: tracing setup with a SIGHUP-reopenable log file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metricsearch::index::MetricTree;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tree = MetricTree::new("./index", 1000, true)?;
//!
//!     tree.add("host.cpu.idle").await;
//!     tree.add("host.cpu.user").await;
//!
//!     let hits = tree.search("host.cpu.*");
//!     println!("{} metrics matched", hits.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod index;
pub mod logging;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState, RequestStats};
pub use config::{Config, ConfigError, MainConfig, RuntimeConfig};
pub use index::{IndexError, IndexResult, MetricTree, TokenMatcher, TokenValidator};
