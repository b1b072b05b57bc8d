//! Metric tree
//!
//! `MetricTree` owns the trie root and ties the pieces together: validated
//! inserts, glob search, the shard-writer pool, and the cold-path bulk
//! dump/load used for restarts and reindexing.
//!
//! Write path: `add` → trie insert (per-node locks, root to leaf) → on a
//! first-time insertion the metric tail is enqueued on the shard writer of
//! its first token. Read path: `search` expands a working set of dotted
//! prefixes one pattern token per level.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader as AsyncBufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::index::error::{IndexError, IndexResult};
use crate::index::node::Node;
use crate::index::shard::ShardWriter;
use crate::index::validator::TokenValidator;

/// In-memory metric-name index with per-shard disk persistence.
#[derive(Debug)]
pub struct MetricTree {
    index_dir: PathBuf,
    root: Arc<Node>,
    /// Channel depth per shard writer; `None` disables durability entirely.
    sync_buffer: Option<usize>,
    /// first token → its background appender. The lock only serialises
    /// writer creation; senders are cloned out before any await.
    writers: RwLock<HashMap<String, ShardWriter>>,
    /// Suppresses durability enqueues during bulk loads.
    full_reindex: AtomicBool,
    total_metrics: AtomicU64,
    validator: TokenValidator,
}

impl MetricTree {
    /// Open (or create) the index directory and build an empty tree.
    ///
    /// `sync_buffer_size == -1` disables the durability pipeline: no shard
    /// writers are ever created and inserts stay memory-only.
    pub fn new(
        index_dir: impl Into<PathBuf>,
        sync_buffer_size: i64,
        validate_tokens: bool,
    ) -> IndexResult<Self> {
        let index_dir = index_dir.into();
        ensure_index_dir(&index_dir)?;

        tracing::debug!(
            index_dir = %index_dir.display(),
            sync_buffer_size,
            "tree created"
        );

        Ok(Self {
            index_dir,
            root: Arc::new(Node::new()),
            sync_buffer: if sync_buffer_size < 0 {
                None
            } else {
                Some(sync_buffer_size as usize)
            },
            writers: RwLock::new(HashMap::new()),
            full_reindex: AtomicBool::new(false),
            total_metrics: AtomicU64::new(0),
            validator: TokenValidator::new(validate_tokens),
        })
    }

    /// The directory holding the `*.idx` shard files.
    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// Number of accepted leaf paths.
    pub fn total_metrics(&self) -> u64 {
        self.total_metrics.load(Ordering::Relaxed)
    }

    /// Sum of the queue depths of all shard writers.
    pub fn sync_queue_size(&self) -> usize {
        self.writers
            .read()
            .unwrap()
            .values()
            .map(|w| w.queued())
            .sum()
    }

    /// True when no tail is waiting in any writer channel.
    pub fn synced(&self) -> bool {
        self.sync_queue_size() == 0
    }

    /// Insert a metric into the trie and, on first-time insertion, hand its
    /// tail to the durability pipeline.
    ///
    /// Metrics without a first token or without a tail are dropped before
    /// touching the trie. A full shard channel makes this call wait, which
    /// is the intended backpressure on the caller.
    pub async fn add(&self, metric: &str) {
        if metric.is_empty() {
            return;
        }
        let delim = match metric.find('.') {
            Some(pos) if pos > 0 && pos < metric.len() - 1 => pos,
            _ => {
                tracing::debug!(metric, "metric without first token or tail, dropping");
                return;
            }
        };

        if !self.add_no_sync(metric) {
            return;
        }
        if self.full_reindex.load(Ordering::Relaxed) {
            return;
        }

        let first = &metric[..delim];
        let tail = &metric[delim + 1..];
        self.enqueue(first, tail.to_string()).await;
    }

    /// Trie-only insert. Returns true when a new path element was created.
    pub fn add_no_sync(&self, metric: &str) -> bool {
        if metric.is_empty() {
            return false;
        }
        let tokens: Vec<&str> = metric.split('.').collect();
        let mut inserted = false;
        self.root.insert(&tokens, &self.validator, &mut inserted);
        if inserted {
            self.total_metrics.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    async fn enqueue(&self, first: &str, tail: String) {
        let Some(capacity) = self.sync_buffer else {
            return;
        };

        // best-effort fast path; create_writer re-checks under the lock
        let tx = self
            .writers
            .read()
            .unwrap()
            .get(first)
            .map(|writer| writer.sender());
        let tx = match tx {
            Some(tx) => tx,
            None => self.create_writer(first, capacity),
        };

        if tx.send(tail).await.is_err() {
            tracing::error!(shard = first, "shard writer gone, record lost");
        }
    }

    fn create_writer(&self, first: &str, capacity: usize) -> mpsc::Sender<String> {
        let started = Instant::now();
        let mut writers = self.writers.write().unwrap();
        if let Some(writer) = writers.get(first) {
            return writer.sender();
        }
        let writer = ShardWriter::spawn(&self.index_dir, first, capacity);
        let tx = writer.sender();
        writers.insert(first.to_string(), writer);
        tracing::info!("writer created for {first}.idx in {:?}", started.elapsed());
        tx
    }

    /// Glob search over the whole namespace.
    ///
    /// The query is split on `.` and matched one token per trie level.
    /// Results that still have descendants carry a trailing `.` so callers
    /// can tell subtree roots from complete metrics.
    pub fn search(&self, pattern: &str) -> Vec<String> {
        let mut working: HashMap<String, Arc<Node>> = HashMap::new();
        working.insert(String::new(), Arc::clone(&self.root));

        for token in pattern.split('.') {
            let mut next: HashMap<String, Arc<Node>> = HashMap::new();
            for (prefix, node) in &working {
                for (key, child) in node.search(token) {
                    let qualified = if prefix.is_empty() {
                        key
                    } else {
                        format!("{prefix}.{key}")
                    };
                    next.insert(qualified, child);
                }
            }
            working = next;
        }

        working
            .into_iter()
            .map(|(name, node)| {
                if node.is_leaf() {
                    name
                } else {
                    format!("{name}.")
                }
            })
            .collect()
    }

    /// Depth-first dump of every indexed metric into the sink.
    pub fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
        self.root.traverse_dump("", out)
    }

    /// Remove every `*.idx` file in the index directory.
    ///
    /// In-memory state is untouched; this is only meant to run before a
    /// reindex.
    pub fn drop_index(&self) -> IndexResult<()> {
        for entry in fs::read_dir(&self.index_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_str().is_some_and(|n| n.ends_with(".idx")) {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Materialise the whole in-memory tree to shard files, one parallel
    /// dumper per first-level token. Returns the first error seen; every
    /// shard is still attempted.
    pub async fn dump_index(&self) -> IndexResult<()> {
        tracing::info!("syncing the entire index");
        ensure_index_dir(&self.index_dir)?;

        let mut tasks: Vec<JoinHandle<IndexResult<()>>> = Vec::new();
        for (token, node) in self.root.children_snapshot() {
            let path = self.index_dir.join(format!("{token}.idx"));
            tasks.push(tokio::task::spawn_blocking(move || dump_shard(&path, &node)));
        }

        let mut first_err = None;
        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!("shard dump failed: {e}");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(IndexError::Task(e.to_string()));
                    }
                }
            }
        }

        tracing::info!("sync complete");
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Rebuild the tree from the shard files, one parallel loader per
    /// `*.idx` file. Lines failing validation are dropped with a log entry.
    ///
    /// Shard writers are created here as well, so the writer map mirrors
    /// the loaded first-level children from startup on.
    pub async fn load_index(&self) -> IndexResult<()> {
        let started = Instant::now();

        let mut tasks: Vec<JoinHandle<IndexResult<u64>>> = Vec::new();
        for entry in fs::read_dir(&self.index_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(first_token) = name.to_str().and_then(|n| n.strip_suffix(".idx")) else {
                continue;
            };

            let node = self.root.attach_child(first_token);
            if let Some(capacity) = self.sync_buffer {
                let mut writers = self.writers.write().unwrap();
                if !writers.contains_key(first_token) {
                    let writer = ShardWriter::spawn(&self.index_dir, first_token, capacity);
                    writers.insert(first_token.to_string(), writer);
                }
            }

            let path = entry.path();
            let validator = self.validator;
            tasks.push(tokio::task::spawn_blocking(move || {
                load_shard(&path, &node, &validator)
            }));
        }

        if tasks.is_empty() {
            tracing::debug!("index is empty, nothing to load");
            return Ok(());
        }

        let mut first_err = None;
        for task in tasks {
            match task.await {
                Ok(Ok(accepted)) => {
                    self.total_metrics.fetch_add(accepted, Ordering::Relaxed);
                }
                Ok(Err(e)) => {
                    tracing::error!("shard load failed: {e}");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(IndexError::Task(e.to_string()));
                    }
                }
            }
        }

        tracing::info!("index load complete in {:?}", started.elapsed());
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Bulk reindex from a plain-text metrics file, one metric per line.
    ///
    /// Inserts are non-durable while scanning; the complete tree is dumped
    /// to shard files at the end. `limit >= 0` stops after that many lines.
    pub async fn load_txt(&self, path: impl AsRef<Path>, limit: i64) -> IndexResult<()> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        self.load_stream(file, limit).await
    }

    /// Same as [`load_txt`](Self::load_txt) but from any line stream
    /// (used by the stdin import mode).
    pub async fn load_stream<R>(&self, input: R, limit: i64) -> IndexResult<()>
    where
        R: AsyncRead + Unpin,
    {
        self.full_reindex.store(true, Ordering::Relaxed);
        let result = self.load_stream_inner(input, limit).await;
        self.full_reindex.store(false, Ordering::Relaxed);
        result
    }

    async fn load_stream_inner<R>(&self, input: R, limit: i64) -> IndexResult<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = AsyncBufReader::new(input).lines();
        let mut count: i64 = 0;
        while let Some(line) = lines.next_line().await? {
            if limit >= 0 && count == limit {
                break;
            }
            self.add_no_sync(&line);
            count += 1;
            if count % 1_000_000 == 0 {
                tracing::info!("reindexed {count} items");
            }
        }
        tracing::info!("reindexed {count} items");
        self.dump_index().await
    }
}

fn ensure_index_dir(path: &Path) -> IndexResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(IndexError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::DirBuilder::new()
                .recursive(true)
                .mode(0o755)
                .create(path)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn dump_shard(path: &Path, node: &Node) -> IndexResult<()> {
    tracing::debug!(path = %path.display(), "shard dumper started");
    let file = fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    node.traverse_dump("", &mut out)?;
    out.flush()?;
    tracing::debug!(path = %path.display(), "shard dumper finished");
    Ok(())
}

fn load_shard(path: &Path, node: &Node, validator: &TokenValidator) -> IndexResult<u64> {
    tracing::debug!(path = %path.display(), "shard loader started");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut accepted = 0u64;
    for line in reader.lines() {
        let line = line?;
        let tokens: Vec<&str> = line.split('.').collect();
        let mut inserted = false;
        node.insert(&tokens, validator, &mut inserted);
        if inserted {
            accepted += 1;
        }
    }
    tracing::debug!(path = %path.display(), accepted, "shard loader finished");
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    const DATA1: &str = "abook.qa-test1e_yandex_net.some.metric.total";
    const DATA2: &str = "abook.qa-test2e_yandex_net.some.metric.total";
    const DATA3: &str = "abook.qa-test1d_yandex_net.some.metric.total";
    const DATA4: &str = "abook.qa-test2d_yandex_net.some.metric.total";

    async fn seeded_tree() -> (MetricTree, TempDir) {
        let dir = tempdir().unwrap();
        let tree = MetricTree::new(dir.path(), 1000, true).unwrap();
        for metric in [DATA1, DATA2, DATA3, DATA4] {
            tree.add(metric).await;
        }
        (tree, dir)
    }

    fn sorted(mut results: Vec<String>) -> Vec<String> {
        results.sort_unstable();
        results
    }

    async fn wait_for_lines(path: &Path, expected: usize) {
        for _ in 0..500 {
            if let Ok(content) = fs::read_to_string(path) {
                if content.lines().count() >= expected {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("shard file {} never reached {expected} lines", path.display());
    }

    #[tokio::test]
    async fn test_exact_match() {
        let (tree, _dir) = seeded_tree().await;
        assert_eq!(tree.search(DATA1), vec![DATA1.to_string()]);
    }

    #[tokio::test]
    async fn test_star_at_the_end() {
        let (tree, _dir) = seeded_tree().await;
        assert_eq!(
            tree.search("abook.qa-test1e*"),
            vec!["abook.qa-test1e_yandex_net.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_star_at_the_begin() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.*net.some.metric.total");
        assert_eq!(sorted(results), sorted(vec![
            DATA1.into(),
            DATA2.into(),
            DATA3.into(),
            DATA4.into(),
        ]));
    }

    #[tokio::test]
    async fn test_star_in_the_middle() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.qa-test1*_yandex_net");
        assert_eq!(
            sorted(results),
            vec![
                "abook.qa-test1d_yandex_net.".to_string(),
                "abook.qa-test1e_yandex_net.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_lonely_star() {
        let (tree, _dir) = seeded_tree().await;
        assert_eq!(tree.search("abook.*.some.metric.total").len(), 4);
    }

    #[tokio::test]
    async fn test_question_at_the_end() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.qa-test1e_yandex_ne?.some.metric.total");
        assert_eq!(results, vec![DATA1.to_string()]);
    }

    #[tokio::test]
    async fn test_question_at_the_begin() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.?a-test1e_yandex_net.some.metric.total");
        assert_eq!(results, vec![DATA1.to_string()]);
    }

    #[tokio::test]
    async fn test_question_in_the_middle() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.qa-test1?_yandex_net.some.metric.total");
        assert_eq!(sorted(results), vec![DATA3.to_string(), DATA1.to_string()]);
    }

    #[tokio::test]
    async fn test_question_needs_exactly_one_byte() {
        let (tree, _dir) = seeded_tree().await;
        // two bytes follow "test" in every seeded token
        let results = tree.search("abook.qa-test?_yandex_net.some.metric.total");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_class_pattern() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.qa-test[12][ed]*.some.metric.total");
        assert_eq!(results.len(), 4);
    }

    #[tokio::test]
    async fn test_class_pattern_narrow() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.qa-test[12]e*.some.metric.total");
        assert_eq!(sorted(results), sorted(vec![DATA1.into(), DATA2.into()]));
    }

    #[tokio::test]
    async fn test_mixed_metacharacters() {
        let (tree, _dir) = seeded_tree().await;
        let results = tree.search("abook.q*test?e*.some.*.total");
        assert_eq!(sorted(results), sorted(vec![DATA1.into(), DATA2.into()]));
    }

    #[tokio::test]
    async fn test_star_alone_lists_first_level() {
        let (tree, _dir) = seeded_tree().await;
        // non-leaf results carry the trailing dot
        assert_eq!(tree.search("*"), vec!["abook.".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_query_matches_nothing() {
        let (tree, _dir) = seeded_tree().await;
        assert!(tree.search("").is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_add_does_not_count() {
        let (tree, _dir) = seeded_tree().await;
        assert_eq!(tree.total_metrics(), 4);
        tree.add(DATA1).await;
        assert_eq!(tree.total_metrics(), 4);
    }

    #[tokio::test]
    async fn test_long_token_dropped() {
        let (tree, _dir) = seeded_tree().await;
        let long = format!("{}.some.valid.tokens", "x".repeat(501));
        tree.add(&long).await;
        assert_eq!(tree.total_metrics(), 4);
    }

    #[tokio::test]
    async fn test_invalid_metric_dropped() {
        let (tree, _dir) = seeded_tree().await;
        tree.add("'()&%<acx><ScRiPt >prompt(915633)<.if(some){.ops").await;
        assert_eq!(tree.total_metrics(), 4);
    }

    #[tokio::test]
    async fn test_empty_token_metric_dropped() {
        let (tree, _dir) = seeded_tree().await;
        tree.add("mail.mail_xivahub_var..xivahub.total.1xx").await;
        assert_eq!(tree.total_metrics(), 4);
    }

    #[tokio::test]
    async fn test_metric_without_tail_rejected() {
        let dir = tempdir().unwrap();
        let tree = MetricTree::new(dir.path(), 1000, true).unwrap();
        tree.add("").await;
        tree.add("abook").await;
        tree.add(".abook").await;
        tree.add("abook.").await;
        assert_eq!(tree.total_metrics(), 0);
        assert!(tree.search("*").is_empty());
    }

    #[tokio::test]
    async fn test_add_is_visible_to_search_immediately() {
        let dir = tempdir().unwrap();
        let tree = MetricTree::new(dir.path(), 1000, true).unwrap();
        tree.add("host.cpu.idle").await;
        assert_eq!(tree.search("host.cpu.idle"), vec!["host.cpu.idle".to_string()]);
    }

    #[tokio::test]
    async fn test_persistence_roundtrip() {
        let (tree, dir) = seeded_tree().await;
        wait_for_lines(&dir.path().join("abook.idx"), 4).await;
        drop(tree);

        let reloaded = MetricTree::new(dir.path(), 1000, true).unwrap();
        reloaded.load_index().await.unwrap();
        assert_eq!(reloaded.total_metrics(), 4);
        assert_eq!(reloaded.search(DATA1), vec![DATA1.to_string()]);
    }

    #[tokio::test]
    async fn test_dump_and_load_are_identity_on_leaves() {
        let (tree, dir) = seeded_tree().await;
        tree.dump_index().await.unwrap();

        let mut dumped = Vec::new();
        tree.dump(&mut dumped).unwrap();
        let dumped = String::from_utf8(dumped).unwrap();
        drop(tree);

        let reloaded = MetricTree::new(dir.path(), 1000, true).unwrap();
        reloaded.load_index().await.unwrap();
        let mut reloaded_dump = Vec::new();
        reloaded.dump(&mut reloaded_dump).unwrap();
        let reloaded_dump = String::from_utf8(reloaded_dump).unwrap();

        let mut before: Vec<&str> = dumped.lines().collect();
        let mut after: Vec<&str> = reloaded_dump.lines().collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_load_index_absorbs_duplicates() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("abook.idx"),
            "one.two\none.two\nthree.four\n",
        )
        .unwrap();

        let tree = MetricTree::new(dir.path(), 1000, true).unwrap();
        tree.load_index().await.unwrap();
        assert_eq!(tree.total_metrics(), 2);
    }

    #[tokio::test]
    async fn test_load_index_drops_invalid_lines() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("abook.idx"), "good.tail\nbad tail.here\n").unwrap();

        let tree = MetricTree::new(dir.path(), 1000, true).unwrap();
        tree.load_index().await.unwrap();
        assert_eq!(tree.total_metrics(), 1);
        assert_eq!(tree.search("abook.good.tail").len(), 1);
    }

    #[tokio::test]
    async fn test_load_txt_reindex() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("metrics.txt");
        fs::write(&txt, format!("{DATA1}\n{DATA2}\n{DATA3}\n{DATA4}\n")).unwrap();

        let index_dir = dir.path().join("index");
        let tree = MetricTree::new(&index_dir, 1000, true).unwrap();
        tree.load_txt(&txt, -1).await.unwrap();
        assert_eq!(tree.total_metrics(), 4);
        assert!(index_dir.join("abook.idx").exists());

        let reloaded = MetricTree::new(&index_dir, 1000, true).unwrap();
        reloaded.load_index().await.unwrap();
        assert_eq!(reloaded.total_metrics(), 4);
    }

    #[tokio::test]
    async fn test_load_txt_respects_limit() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("metrics.txt");
        fs::write(&txt, format!("{DATA1}\n{DATA2}\n{DATA3}\n{DATA4}\n")).unwrap();

        let index_dir = dir.path().join("index");
        let tree = MetricTree::new(&index_dir, 1000, true).unwrap();
        tree.load_txt(&txt, 2).await.unwrap();
        assert_eq!(tree.total_metrics(), 2);
    }

    #[tokio::test]
    async fn test_drop_index_removes_shards_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("abook.idx"), "a.b\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me\n").unwrap();

        let tree = MetricTree::new(dir.path(), 1000, true).unwrap();
        tree.drop_index().unwrap();
        assert!(!dir.path().join("abook.idx").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_disabled_durability_creates_no_writers() {
        let dir = tempdir().unwrap();
        let tree = MetricTree::new(dir.path(), -1, true).unwrap();
        tree.add(DATA1).await;
        assert_eq!(tree.total_metrics(), 1);
        assert_eq!(tree.sync_queue_size(), 0);
        assert!(!dir.path().join("abook.idx").exists());
        assert_eq!(tree.search(DATA1), vec![DATA1.to_string()]);
    }

    #[tokio::test]
    async fn test_relaxed_validation_admits_odd_tokens() {
        let dir = tempdir().unwrap();
        let tree = MetricTree::new(dir.path(), -1, false).unwrap();
        tree.add("weird.to ken.total").await;
        assert_eq!(tree.total_metrics(), 1);
    }

    #[test]
    fn test_index_dir_must_be_a_directory() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("not_a_dir");
        fs::write(&file_path, "").unwrap();
        let err = MetricTree::new(&file_path, 1000, true).unwrap_err();
        assert!(matches!(err, IndexError::NotADirectory(_)));
    }
}
