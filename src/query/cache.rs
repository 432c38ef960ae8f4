//! Bounded cache of compiled query trees.
//!
//! A live search box recompiles the same handful of strings over and over
//! (typing, deleting, retyping). The cache keys on the trimmed query text.

use crate::query::compiler::{Expr, compile};
use crate::query::lexer::tokenize;
use lru::LruCache;
use std::num::NonZeroUsize;

pub struct QueryCache {
    entries: LruCache<String, Option<Expr>>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    /// Create a cache holding at most `capacity` trees (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Compiled tree for `query`, compiling on a miss
    pub fn compiled(&mut self, query: &str) -> Option<&Expr> {
        let key = query.trim();

        if self.entries.contains(key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            let expr = compile(&tokenize(key));
            tracing::trace!(query = key, "query cache miss");
            self.entries.put(key.to_string(), expr);
        }

        self.entries.get(key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
