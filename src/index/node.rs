//! Trie node
//!
//! Each node owns a map from child token to child node and nothing else: a
//! node does not know its own token (that is the key under which its parent
//! stores it) and has no parent backreference. A node with no children is a
//! leaf and corresponds to a complete indexed metric.
//!
//! Insertion locks one node at a time, strictly root to leaf, so concurrent
//! inserts cannot deadlock. Readers take the same per-node lock only long
//! enough to snapshot the child map, never across recursion.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};

use crate::index::pattern::TokenMatcher;
use crate::index::validator::TokenValidator;

/// Mutable node in the token trie.
#[derive(Debug, Default)]
pub struct Node {
    children: RwLock<HashMap<String, Arc<Node>>>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursive insert of a token path below this node.
    ///
    /// `inserted` is set to true when a new child is created at any level
    /// and cleared to false when an inadmissible token aborts the walk.
    /// Ancestors created earlier in the same call remain in the tree; they
    /// are admissible themselves and will be reused by later inserts.
    pub fn insert(&self, tokens: &[&str], validator: &TokenValidator, inserted: &mut bool) {
        let Some((first, tail)) = tokens.split_first() else {
            return;
        };

        if !validator.is_admissible(first) {
            *inserted = false;
            tracing::warn!(token = *first, "inadmissible token, dropping metric");
            return;
        }

        let child = {
            let mut children = self.children.write().unwrap();
            match children.get(*first) {
                Some(child) => Arc::clone(child),
                None => {
                    *inserted = true;
                    let child = Arc::new(Node::new());
                    children.insert((*first).to_string(), Arc::clone(&child));
                    child
                }
            }
        };

        child.insert(tail, validator, inserted);
    }

    /// True when this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.read().unwrap().is_empty()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.read().unwrap().len()
    }

    /// Clone out the current children as (token, node) pairs.
    pub(crate) fn children_snapshot(&self) -> Vec<(String, Arc<Node>)> {
        self.children
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect()
    }

    /// Attach a fresh child under `token`, returning its handle.
    ///
    /// Used by the cold-path index loader, which owns one subtree per shard
    /// file.
    pub(crate) fn attach_child(&self, token: &str) -> Arc<Node> {
        let child = Arc::new(Node::new());
        self.children
            .write()
            .unwrap()
            .insert(token.to_string(), Arc::clone(&child));
        child
    }

    /// Depth-first dump of all leaf paths below this node.
    ///
    /// Every leaf emits `prefix\n` into the sink; sibling order is
    /// unspecified.
    pub fn traverse_dump(&self, prefix: &str, out: &mut dyn Write) -> io::Result<()> {
        let children = self.children_snapshot();
        if children.is_empty() {
            out.write_all(prefix.as_bytes())?;
            out.write_all(b"\n")?;
            return Ok(());
        }
        for (token, child) in children {
            let next = if prefix.is_empty() {
                token
            } else {
                format!("{prefix}.{token}")
            };
            child.traverse_dump(&next, out)?;
        }
        Ok(())
    }

    /// Children of this node whose token matches one glob pattern token.
    pub fn search(&self, pattern: &str) -> HashMap<String, Arc<Node>> {
        if pattern == "*" {
            return self.children.read().unwrap().clone();
        }

        let matcher = TokenMatcher::compile(pattern);

        if let Some(key) = matcher.as_literal() {
            let children = self.children.read().unwrap();
            return match children.get(key) {
                Some(child) => HashMap::from([(key.to_string(), Arc::clone(child))]),
                None => HashMap::new(),
            };
        }

        self.children
            .read()
            .unwrap()
            .iter()
            .filter(|(key, _)| matcher.matches(key))
            .map(|(key, child)| (key.clone(), Arc::clone(child)))
            .collect()
    }
}
