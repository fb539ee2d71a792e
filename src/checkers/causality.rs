//! Causality / pair checker (`cpair`, §4.7).
//!
//! For each call on a path, records the set of distinct callee names that
//! follow it later on the *same* path. Repeated observations of the same
//! (key, code) pair are intersected — never unioned — so the checker only
//! ever reports a follow-up call that held on every path which reached the
//! source call with this code.

use std::collections::{HashMap, HashSet};

use crate::config::model::Config;
use crate::core::ExecNode;
use crate::model::BugReport;
use crate::store::Context;

use super::{is_alloc, is_dealloc, is_lock, is_unlock, render_ranges, CheckerImpl};

#[derive(Default, Clone)]
pub struct CausalityCtx {
    /// Keyed by (callee, constraint) — the same callee checked under two
    /// different path constraints is a distinct usage, never pooled.
    inner: Context<(String, String), String>,
    /// (callee, constraint, code) -> intersected set of follow-up callees,
    /// accumulated across every path-visit before being flushed to `inner`.
    entries: HashMap<(String, String, String), HashSet<String>>,
}

pub struct CausalityChecker;

impl CheckerImpl for CausalityChecker {
    type Ctx = CausalityCtx;
    const NAME: &'static str = "cpair";

    fn process_path(path: &[&ExecNode], ctx: &mut Self::Ctx) {
        let cmgr = &path.last().expect("path is never empty").constraints;
        for (i, node) in path.iter().enumerate() {
            if !node.event.is_call() {
                continue;
            }
            let Some(code) = node.event.code() else { continue };
            let Some(name) = node.event.call_name() else { continue };
            let constraint = render_ranges(cmgr.get(&node.event.symbol)).unwrap_or_default();

            let mut followers: HashSet<String> = HashSet::new();
            for later in &path[i + 1..] {
                if later.event.is_call() {
                    if let Some(later_name) = later.event.call_name() {
                        if later_name != name {
                            followers.insert(later_name.to_string());
                        }
                    }
                }
            }

            let entry_key = (name.to_string(), constraint, code.to_string());
            ctx.entries
                .entry(entry_key)
                .and_modify(|existing| *existing = existing.intersection(&followers).cloned().collect())
                .or_insert(followers);
        }
    }

    fn merge(ctxs: Vec<Self::Ctx>, config: &Config) -> Vec<BugReport> {
        let Some((first, rest)) = ctxs.split_first() else { return Vec::new() };
        let mut merged = first.clone();
        for c in rest {
            for (key, followers) in &c.entries {
                merged
                    .entries
                    .entry(key.clone())
                    .and_modify(|existing| {
                        *existing = existing.intersection(followers).cloned().collect()
                    })
                    .or_insert_with(|| followers.clone());
            }
        }

        for ((name, constraint, code), followers) in &merged.entries {
            let key = (name.clone(), constraint.clone());
            for follower in followers {
                merged.inner.add(key.clone(), Some(follower.clone()), code.clone());
            }
            merged.inner.add(key, None::<String>, code.clone());
        }

        let mut reports: Vec<BugReport> = merged
            .inner
            .get_bugs(config)
            .into_iter()
            .map(|bug| {
                let (name, constraint) = &bug.key;
                let mut score = bug.score;
                if is_alloc(name) && is_dealloc(&bug.ctx) {
                    score += 0.5;
                } else if is_lock(name) && is_unlock(&bug.ctx) {
                    score += 0.5;
                } else if is_dealloc(&bug.ctx) {
                    score += 0.3;
                }
                let key = if constraint.is_empty() {
                    name.clone()
                } else {
                    format!("{name} [{constraint}]")
                };
                BugReport::new(Self::NAME, key, bug.ctx, bug.code, score)
            })
            .collect();
        reports.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dealloc_path_is_flagged() {
        let mut ctx = CausalityCtx::default();
        for i in 0..8 {
            ctx.entries.insert(
                ("alloc_x".to_string(), String::new(), format!("alloc_x(){i}")),
                HashSet::from(["free_x".to_string()]),
            );
        }
        ctx.entries.insert(
            ("alloc_x".to_string(), String::new(), "alloc_x()_leak".to_string()),
            HashSet::new(),
        );

        let bugs = CausalityChecker::merge(vec![ctx], &Config::default());
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].code, "alloc_x()_leak");
        assert!(bugs[0].score > 0.8);
    }

    #[test]
    fn distinct_constraints_on_the_same_callee_do_not_pool() {
        // Under constraint "A", alloc_x is almost always followed by
        // free_x; under constraint "B" it's almost always followed by a
        // different call, log_x. Each constraint has its own minority
        // deviator. Pooling both contexts under the name alone would
        // dilute every ctx bucket under 9+9=18 total uses, below
        // threshold, masking both real deviations.
        let mut ctx = CausalityCtx::default();
        for i in 0..8 {
            ctx.entries.insert(
                ("alloc_x".to_string(), "A".to_string(), format!("a_freed(){i}")),
                HashSet::from(["free_x".to_string()]),
            );
        }
        ctx.entries.insert(
            ("alloc_x".to_string(), "A".to_string(), "a_leak()".to_string()),
            HashSet::new(),
        );
        for i in 0..8 {
            ctx.entries.insert(
                ("alloc_x".to_string(), "B".to_string(), format!("b_log(){i}")),
                HashSet::from(["log_x".to_string()]),
            );
        }
        ctx.entries.insert(
            ("alloc_x".to_string(), "B".to_string(), "b_odd()".to_string()),
            HashSet::from(["free_x".to_string()]),
        );

        let bugs = CausalityChecker::merge(vec![ctx], &Config::default());
        let codes: HashSet<_> = bugs.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(bugs.len(), 2, "{bugs:?}");
        assert!(codes.contains("a_leak()"));
        assert!(codes.contains("b_odd()"));
    }
}
