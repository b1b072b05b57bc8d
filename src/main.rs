//! metricsearch daemon
//!
//! Loads the configuration, rebuilds the index from its shard files and
//! serves the HTTP API. The `--reindex` and `--stdin` modes instead drop
//! the on-disk index, bulk-load metric names and exit.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use metricsearch::api::{self, AppState};
use metricsearch::config::{Config, DEFAULT_CONFIG_FILE};
use metricsearch::index::MetricTree;
use metricsearch::logging::{self, ReopenableLog};

#[derive(Parser)]
#[command(
    name = "metricsearch",
    version,
    about = "In-memory search index for hierarchical metric names"
)]
struct Args {
    /// metricsearch config filename
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Reindex from a plain text metrics file, then exit
    #[arg(long, value_name = "FILE")]
    reindex: Option<PathBuf>,

    /// Reindex from stdin, then exit
    #[arg(long)]
    stdin: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // config is needed before logging can be set up; remember a load
    // failure and report it once the subscriber exists
    let (config, config_err) = match Config::load(&args.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_handle = logging::init(&config.main);
    if let Some(e) = config_err {
        tracing::warn!("{e}; using configuration defaults");
    }

    tracing::debug!(
        max_cores = config.runtime.max_cores,
        max_threads = config.runtime.max_threads,
        "configuring runtime"
    );
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.runtime.max_cores)
        .max_blocking_threads(config.runtime.max_threads)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to build runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(args, config, log_handle))
}

async fn run(args: Args, config: Config, log_handle: Option<ReopenableLog>) -> ExitCode {
    if let Some(log) = log_handle {
        logging::spawn_hup_listener(log);
    }

    tracing::info!("metricsearch v{}", env!("CARGO_PKG_VERSION"));

    let tree = match MetricTree::new(
        &config.main.index_directory,
        config.main.sync_buffer_size,
        config.main.validate_tokens,
    ) {
        Ok(tree) => Arc::new(tree),
        Err(e) => {
            tracing::error!("{e}");
            tracing::error!("no way to continue, exiting");
            return ExitCode::FAILURE;
        }
    };

    if args.stdin {
        if let Err(e) = tree.drop_index() {
            tracing::error!("error dropping index: {e}");
            return ExitCode::FAILURE;
        }
        if let Err(e) = tree.load_stream(tokio::io::stdin(), -1).await {
            tracing::error!("reindexing error: {e}");
            return ExitCode::FAILURE;
        }
        tracing::info!("reindexing complete");
        return ExitCode::SUCCESS;
    }

    if let Some(path) = &args.reindex {
        if let Err(e) = tree.drop_index() {
            tracing::error!("error dropping index: {e}");
            return ExitCode::FAILURE;
        }
        if let Err(e) = tree.load_txt(path, -1).await {
            tracing::error!("reindexing error: {e}");
            return ExitCode::FAILURE;
        }
        tracing::info!("reindexing complete");
        return ExitCode::SUCCESS;
    }

    if let Err(e) = tree.load_index().await {
        tracing::error!("error loading index: {e}");
    }

    let state = Arc::new(AppState::new(tree, &config.main));
    match api::serve(state, &config.listen_addr()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
