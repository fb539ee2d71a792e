//! Argument-aliasing checker (`args`, §4.7).
//!
//! For every pair of arguments to the same call, records whether the two
//! are "related": at least one is itself a call, and they share an `Id`
//! descendant. A call-argument pair that is usually related but
//! occasionally isn't (or vice versa) is a candidate bug.

use std::collections::HashSet;

use crate::config::model::Config;
use crate::core::ExecNode;
use crate::model::{BugReport, Symbol};
use crate::store::Context;

use super::CheckerImpl;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgPairKey {
    pub callee: String,
    pub i: usize,
    pub j: usize,
}

impl std::fmt::Display for ArgPairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}#{}", self.callee, self.i, self.j)
    }
}

fn id_descendants(sym: &Symbol) -> HashSet<Symbol> {
    sym.id_descendants()
}

fn is_related(a: &Symbol, b: &Symbol) -> bool {
    if !a.is_call() && !b.is_call() {
        return false;
    }
    !id_descendants(a).is_disjoint(&id_descendants(b))
}

pub struct ArgChecker;

impl CheckerImpl for ArgChecker {
    type Ctx = Context<ArgPairKey, bool>;
    const NAME: &'static str = "args";

    fn process_path(path: &[&ExecNode], ctx: &mut Self::Ctx) {
        for node in path {
            if !node.event.is_call() {
                continue;
            }
            let Some(code) = node.event.code() else { continue };
            let Some(callee) = node.event.call_name() else { continue };
            let args = node.event.args();
            for i in 0..args.len() {
                for j in (i + 1)..args.len() {
                    let related = is_related(&args[i], &args[j]);
                    ctx.add(
                        ArgPairKey { callee: callee.to_string(), i, j },
                        Some(related),
                        code.to_string(),
                    );
                }
            }
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
            if total.is_empty() {
                continue;
            }
            let related = per_ctx.get(&true).map(HashSet::len).unwrap_or(0);
            let score = related as f64 / total.len() as f64;
            if score >= config.threshold && score < 1.0 {
                if let Some(codes) = per_ctx.get(&false) {
                    for code in codes {
                        reports.push(BugReport::new(
                            Self::NAME,
                            key.to_string(),
                            "false".to_string(),
                            code.clone(),
                            score,
                        ));
                    }
                }
            }
        }
        reports.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        reports
    }
}
