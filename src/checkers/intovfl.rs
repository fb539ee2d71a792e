//! Integer-overflow checker (`intovfl`, §4.7).
//!
//! For each binary-op call argument, recursively peels off constant
//! additive/multiplicative terms to reduce the expression to a single
//! symbolic operand, then compares whatever range that operand is
//! constrained to against the shrunk limit. A bug is a verdict other than
//! `Correct` at a key that has at least one `Correct` sample — i.e. the
//! pattern is usually checked, and this site wasn't.

use crate::config::model::Config;
use crate::core::{ConstraintMgr, ExecNode};
use crate::model::{BugReport, Symbol};
use crate::store::Context;

use super::{ArgKey, CheckerImpl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Wrong,
    Missing,
    Correct,
    Undefined,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Default symbolic range an unchecked unsigned 32-bit value could hold.
pub const DEFAULT_LIMIT: (i64, i64) = (0, u32::MAX as i64);

/// `check_ovfl` from §4.7, ported verbatim: peel off a constant operand of
/// `+`/`*` and shrink `limit` accordingly, recursing on the remaining
/// symbolic operand; once reduced to a non-`BinaryOp`, compare its bound
/// range (if any) against the shrunk limit.
pub fn check_ovfl(arg: &Symbol, cmgr: &ConstraintMgr, limit: (i64, i64)) -> Verdict {
    if let Symbol::BinaryOp { lhs, op, rhs } = arg {
        let (lhs, rhs) = if rhs.is_concrete_int() { (rhs.as_ref(), lhs.as_ref()) } else { (lhs.as_ref(), rhs.as_ref()) };

        if let Some(c) = lhs.as_concrete_int() {
            let new_limit = match op.as_str() {
                "+" => (limit.0 - c, limit.1 - c),
                "*" if c != 0 => (limit.0 / c, limit.1 / c),
                _ => return Verdict::Undefined,
            };
            return check_ovfl(rhs, cmgr, new_limit);
        }
        return Verdict::Missing; // two non-constant symbols: can't reason
    }

    match cmgr.get(arg) {
        Some(ranges) if ranges.len() >= 2 => Verdict::Undefined,
        Some(ranges) => {
            if ranges.iter().all(|(lo, hi)| *lo >= limit.0 && *hi <= limit.1) {
                Verdict::Correct
            } else {
                Verdict::Wrong
            }
        }
        None if limit == DEFAULT_LIMIT => Verdict::Undefined,
        None => Verdict::Missing,
    }
}

pub struct IntOvflChecker;

impl CheckerImpl for IntOvflChecker {
    type Ctx = Context<ArgKey, Verdict>;
    const NAME: &'static str = "intovfl";

    fn process_path(path: &[&ExecNode], ctx: &mut Self::Ctx) {
        let cmgr = &path.last().expect("path is never empty").constraints;
        for node in path {
            if !node.event.is_call() {
                continue;
            }
            let Some(code) = node.event.code() else { continue };
            let Some(callee) = node.event.call_name() else { continue };
            for (index, arg) in node.event.args().iter().enumerate() {
                if !matches!(arg, Symbol::BinaryOp { .. }) {
                    continue;
                }
                let verdict = check_ovfl(arg, cmgr, DEFAULT_LIMIT);
                if verdict != Verdict::Undefined {
                    ctx.add(
                        ArgKey { callee: callee.to_string(), index },
                        Some(verdict),
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
            let correct = per_ctx.get(&Verdict::Correct).map(|s| s.len()).unwrap_or(0);
            if correct == 0 || total.is_empty() {
                continue;
            }
            let score = correct as f64 / total.len() as f64;
            for (verdict, codes) in per_ctx {
                if *verdict == Verdict::Correct {
                    continue;
                }
                for code in codes {
                    let mut bonus = score;
                    if *verdict == Verdict::Wrong {
                        bonus += 0.3;
                    }
                    reports.push(BugReport::new(
                        Self::NAME,
                        key.to_string(),
                        verdict.to_string(),
                        code.clone(),
                        bonus,
                    ));
                }
            }
        }
        reports.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mul(c: i64) -> Symbol {
        Symbol::BinaryOp {
            lhs: Box::new(Symbol::Id("x".into())),
            op: "*".to_string(),
            rhs: Box::new(Symbol::ConcreteInt(c)),
        }
    }

    #[test]
    fn correct_when_bound_matches_shrunk_limit() {
        let mgr = ConstraintMgr::default();
        let x = Symbol::Id("x".into());
        let assume = crate::model::Event::new(
            crate::model::EventKind::Assume,
            Symbol::Constraint { target: Box::new(x), ranges: vec![(0, u32::MAX as i64 / 4)] },
        );
        let mgr = mgr.advance(&assume);
        assert_eq!(check_ovfl(&mul(4), &mgr, DEFAULT_LIMIT), Verdict::Correct);
    }

    #[test]
    fn wrong_when_bound_exceeds_shrunk_limit() {
        let mgr = ConstraintMgr::default();
        let x = Symbol::Id("x".into());
        let assume = crate::model::Event::new(
            crate::model::EventKind::Assume,
            Symbol::Constraint { target: Box::new(x), ranges: vec![(0, u32::MAX as i64)] },
        );
        let mgr = mgr.advance(&assume);
        assert_eq!(check_ovfl(&mul(4), &mgr, DEFAULT_LIMIT), Verdict::Wrong);
    }

    #[test]
    fn missing_when_unbound() {
        let mgr = ConstraintMgr::default();
        assert_eq!(check_ovfl(&mul(4), &mgr, DEFAULT_LIMIT), Verdict::Missing);
    }

    #[test]
    fn terminates_on_nested_binary_ops() {
        let nested = Symbol::BinaryOp {
            lhs: Box::new(mul(2)),
            op: "+".to_string(),
            rhs: Box::new(Symbol::ConcreteInt(1)),
        };
        let mgr = ConstraintMgr::default();
        // Must return, not loop: lhs is itself a BinaryOp, which is
        // neither a ConcreteInt nor reducible further by this rule.
        let _ = check_ovfl(&nested, &mgr, DEFAULT_LIMIT);
    }
}
