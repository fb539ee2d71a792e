//! Return-value checker (`rvchk`, §4.7).
//!
//! Keys each call by its callee name, contextualizes it by whatever range
//! constraint the path binds to the call expression itself (the trace's
//! convention for "this call's return value was checked against..."), and
//! flags call sites that never got that check. A call occurring as the
//! penultimate node of its path is exempted — the wrapper-tail heuristic,
//! since a wrapper function's return value may simply not be checked yet
//! at the point the trace ends.
//!
//! `merge` does not use the shared `Context::get_bugs` minority-deviation
//! scan: the upstream `RetValContext.get_bugs` instead narrows a single
//! `diff` set per key across every qualifying context in turn (`diff =
//! diff - codes`, repeated), so a code only survives as a bug if it's
//! missing from *all* qualifying contexts, not just one. It also reuses
//! whichever context the narrowing loop last visited as the `ctx` on every
//! bug it emits for that key, rather than the context that happened to
//! leave the code unexplained — a quirk of the original's loop-variable
//! reuse that this keeps rather than "fixes".

use std::collections::{HashMap, HashSet};

use crate::config::model::Config;
use crate::core::ExecNode;
use crate::model::BugReport;
use crate::store::Context;

use super::{is_alloc, render_ranges, CheckerImpl};

pub struct RetValChecker;

impl CheckerImpl for RetValChecker {
    type Ctx = Context<String, String>;
    const NAME: &'static str = "rvchk";

    fn process_path(path: &[&ExecNode], ctx: &mut Self::Ctx) {
        let cmgr = &path.last().expect("path is never empty").constraints;
        for (i, node) in path.iter().enumerate() {
            if !node.event.is_call() {
                continue;
            }
            let Some(code) = node.event.code() else { continue };
            let Some(name) = node.event.call_name() else { continue };
            let constraint = render_ranges(cmgr.get(&node.event.symbol));

            if constraint.is_none() && i == path.len().saturating_sub(2) {
                continue; // wrapper-tail heuristic
            }
            ctx.add(name.to_string(), constraint, code.to_string());
        }
    }

    fn merge(ctxs: Vec<Self::Ctx>, config: &Config) -> Vec<BugReport> {
        let Some((first, rest)) = ctxs.split_first() else { return Vec::new() };
        let mut merged = first.clone();
        for c in rest {
            merged.merge(c);
        }

        let mut reports = Vec::new();
        for (key, per_ctx) in merged.ctx_uses.iter() {
            let total = merged.total_uses.get(key);
            let mut diff: HashSet<String> = total.clone();
            let mut scores: HashMap<String, f64> = HashMap::new();
            let mut last_ctx: Option<&String> = None;

            for (ctx, codes) in per_ctx {
                last_ctx = Some(ctx);
                let score = codes.len() as f64 / total.len() as f64;
                if score >= config.threshold && score != 1.0 {
                    for code in codes {
                        diff.remove(code);
                    }
                    for bug in &diff {
                        scores.insert(bug.clone(), score);
                    }
                }
            }

            if diff.len() != total.len() {
                let ctx = last_ctx.cloned().unwrap_or_default();
                let mut added: HashSet<String> = HashSet::new();
                for bug in &diff {
                    if !added.insert(bug.clone()) {
                        continue;
                    }
                    let mut score = scores[bug];
                    if is_alloc(key) {
                        score += 0.3;
                    }
                    reports.push(BugReport::new(Self::NAME, key.clone(), ctx.clone(), bug.clone(), score));
                }
            }
        }

        reports.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        reports
    }
}
