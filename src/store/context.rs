//! Context: the per-checker accumulator over one run's frequency stores
//! (§4.6, §3).
//!
//! `total_uses` tracks every evidence code ever seen for a key;
//! `ctx_uses` additionally buckets codes by the context they occurred
//! under. The default `get_bugs` implements the canonical minority-
//! deviation inference shared by the pair and condition checkers; `rvchk`,
//! `fsb`, `args`, and `intovfl` each override it with their own shape
//! (see `checkers::*`).

use std::collections::HashSet;
use std::hash::Hash;

use crate::config::model::Config;

use super::frequency::{Store1, Store2};

/// One (score, key, ctx, bug code) deviation, prior to any checker-specific
/// rank bonus.
#[derive(Debug, Clone)]
pub struct RawBug<K, C> {
    pub score: f64,
    pub key: K,
    pub ctx: C,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct Context<K: Eq + Hash + Clone, C: Eq + Hash + Clone> {
    pub total_uses: Store1<K>,
    pub ctx_uses: Store2<K, C>,
}

impl<K: Eq + Hash + Clone, C: Eq + Hash + Clone> Default for Context<K, C> {
    fn default() -> Self {
        Self { total_uses: Store1::default(), ctx_uses: Store2::default() }
    }
}

impl<K: Eq + Hash + Clone, C: Eq + Hash + Clone> Context<K, C> {
    /// Records one occurrence of `code` for `key`; if `ctx` is present it
    /// also gains the evidence under that context bucket.
    pub fn add(&mut self, key: K, ctx: Option<C>, code: impl Into<String>) {
        let code = code.into();
        if let Some(ctx) = ctx {
            self.ctx_uses.insert(key.clone(), ctx, code.clone());
        }
        self.total_uses.insert(key, code);
    }

    pub fn merge(&mut self, other: &Context<K, C>) {
        self.total_uses.merge(&other.total_uses);
        self.ctx_uses.merge(&other.ctx_uses);
    }

    /// Canonical inference (§4.6): for each key/context bucket whose share
    /// of the key's total evidence meets threshold, every code missing
    /// from that bucket (i.e. the majority not seen under this context) is
    /// reported as a deviation. Bug codes already emitted for a given key
    /// are suppressed on a later context bucket.
    pub fn get_bugs(&self, config: &Config) -> Vec<RawBug<K, C>> {
        let mut out = Vec::new();
        for (key, per_ctx) in self.ctx_uses.iter() {
            let total = self.total_uses.get(key);
            let mut emitted: HashSet<String> = HashSet::new();
            for (ctx, codes) in per_ctx {
                if total.is_empty() {
                    continue;
                }
                let score = codes.len() as f64 / total.len() as f64;
                if score >= config.threshold && score < 1.0 {
                    for bug in total.difference(codes) {
                        if emitted.insert(bug.clone()) {
                            out.push(RawBug {
                                score,
                                key: key.clone(),
                                ctx: ctx.clone(),
                                code: bug.clone(),
                            });
                        }
                    }
                }
            }
        }
        out
    }
}
