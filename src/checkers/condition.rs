//! Condition checker (`cond`, §4.7).
//!
//! For every ordered pair of distinct calls on a path, keys the first by
//! its (callee, constraint) and contexts it by the second's (callee,
//! constraint). No rank bonus — deviations are reported purely by the
//! default inference.

use crate::config::model::Config;
use crate::core::ExecNode;
use crate::model::BugReport;
use crate::store::Context;

use super::{render_ranges, CheckerImpl};

/// A call paired with the immutable constraint bound to it, rendered as
/// `"<callee>|<ranges-or-empty>"` so it can serve as both a `Context` key
/// and context value.
fn call_ctx_key(name: &str, constraint: &Option<String>) -> String {
    format!("{}|{}", name, constraint.as_deref().unwrap_or(""))
}

pub struct CondChecker;

impl CheckerImpl for CondChecker {
    type Ctx = Context<String, String>;
    const NAME: &'static str = "cond";

    fn process_path(path: &[&ExecNode], ctx: &mut Self::Ctx) {
        let cmgr = &path.last().expect("path is never empty").constraints;
        for (i, node) in path.iter().enumerate() {
            if !node.event.is_call() {
                continue;
            }
            let Some(code) = node.event.code() else { continue };
            let Some(name) = node.event.call_name() else { continue };
            let constraint = render_ranges(cmgr.get(&node.event.symbol));
            let key = call_ctx_key(name, &constraint);

            for (j, other) in path.iter().enumerate() {
                if i == j || !other.event.is_call() {
                    continue;
                }
                let Some(other_name) = other.event.call_name() else { continue };
                let other_constraint = render_ranges(cmgr.get(&other.event.symbol));
                let other_key = call_ctx_key(other_name, &other_constraint);
                ctx.add(key.clone(), Some(other_key), code.to_string());
            }
        }
    }

    fn merge(ctxs: Vec<Self::Ctx>, config: &Config) -> Vec<BugReport> {
        let Some((first, rest)) = ctxs.split_first() else { return Vec::new() };
        let mut merged = first.clone();
        for c in rest {
            merged.merge(c);
        }
        let mut reports: Vec<BugReport> = merged
            .get_bugs(config)
            .into_iter()
            .map(|bug| BugReport::new(Self::NAME, bug.key, bug.ctx, bug.code, bug.score))
            .collect();
        reports.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_pair_misuse_yields_two_bugs() {
        // X and Y always co-occur under complementary constraints; one
        // path calls X under constraint but never reaches Y.
        let mut ctx: Context<String, String> = Context::default();
        for i in 0..8 {
            ctx.add(
                call_ctx_key("X", &Some("[1,1]".to_string())),
                Some(call_ctx_key("Y", &Some("[0,0]".to_string()))),
                format!("X(){i}"),
            );
            ctx.add(
                call_ctx_key("Y", &Some("[0,0]".to_string())),
                Some(call_ctx_key("X", &Some("[1,1]".to_string()))),
                format!("Y(){i}"),
            );
        }
        // Minority path: X called, Y never reached on that path, so X's
        // evidence is still recorded under total but the Y-context key
        // never gains it.
        ctx.add(call_ctx_key("X", &Some("[1,1]".to_string())), None, "X()_only".to_string());
        ctx.add(call_ctx_key("Y", &Some("[0,0]".to_string())), None, "Y()_missing".to_string());

        let bugs = CondChecker::merge(vec![ctx], &Config::default());
        assert_eq!(bugs.len(), 2);
    }
}
