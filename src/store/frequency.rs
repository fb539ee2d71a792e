//! Two-level frequency store (§4.6).
//!
//! Level 1 maps a usage key to a set of evidence codes. Level 2 additionally
//! nests by context key. Both auto-vivify empty containers on read
//! (default-dict semantics) and merge by unioning leaf sets, which is
//! commutative and associative — the property the whole pipeline leans on
//! to make per-file results order-independent.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Level-1 store: usage key → set of evidence codes.
#[derive(Debug, Clone)]
pub struct Store1<K: Eq + Hash + Clone> {
    inner: HashMap<K, HashSet<String>>,
}

impl<K: Eq + Hash + Clone> Default for Store1<K> {
    fn default() -> Self {
        Self { inner: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone> Store1<K> {
    pub fn get(&self, key: &K) -> &HashSet<String> {
        static EMPTY: std::sync::OnceLock<HashSet<String>> = std::sync::OnceLock::new();
        self.inner.get(key).unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }

    pub fn insert(&mut self, key: K, code: String) {
        self.inner.entry(key).or_default().insert(code);
    }

    pub fn merge(&mut self, other: &Store1<K>) {
        for (key, codes) in &other.inner {
            self.inner.entry(key.clone()).or_default().extend(codes.iter().cloned());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &HashSet<String>)> {
        self.inner.iter()
    }
}

/// Level-2 store: usage key → context key → set of evidence codes.
#[derive(Debug, Clone)]
pub struct Store2<K: Eq + Hash + Clone, C: Eq + Hash + Clone> {
    inner: HashMap<K, HashMap<C, HashSet<String>>>,
}

impl<K: Eq + Hash + Clone, C: Eq + Hash + Clone> Default for Store2<K, C> {
    fn default() -> Self {
        Self { inner: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone, C: Eq + Hash + Clone> Store2<K, C> {
    pub fn insert(&mut self, key: K, ctx: C, code: String) {
        self.inner.entry(key).or_default().entry(ctx).or_default().insert(code);
    }

    pub fn merge(&mut self, other: &Store2<K, C>) {
        for (key, per_ctx) in &other.inner {
            let slot = self.inner.entry(key.clone()).or_default();
            for (ctx, codes) in per_ctx {
                slot.entry(ctx.clone()).or_default().extend(codes.iter().cloned());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &HashMap<C, HashSet<String>>)> {
        self.inner.iter()
    }
}
