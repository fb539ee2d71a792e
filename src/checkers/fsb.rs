//! Format-string-bug checker (`fsb`, §4.7).
//!
//! Keys each call argument position by `(callee, index)` and contexts it
//! by a two-bit `(is_string_literal, is_format_like)` pair. The "correct"
//! population for a key is every evidence code observed with a literal in
//! that position; any non-literal context whose share of the total meets
//! threshold is reported, carrying every evidence code seen under it.

use crate::config::model::Config;
use crate::core::ExecNode;
use crate::model::BugReport;
use crate::store::Context;

use super::{is_print, ArgKey, CheckerImpl};

const FORMAT_SPECIFIERS: &[&str] = &["%d", "%p", "%x", "%s", "%u", "%c"];

fn is_format_like(s: &str) -> bool {
    FORMAT_SPECIFIERS.iter().any(|spec| s.contains(spec))
}

pub struct FsbChecker;

impl CheckerImpl for FsbChecker {
    type Ctx = Context<ArgKey, (bool, bool)>;
    const NAME: &'static str = "fsb";

    fn process_path(path: &[&ExecNode], ctx: &mut Self::Ctx) {
        for node in path {
            if !node.event.is_call() {
                continue;
            }
            let Some(code) = node.event.code() else { continue };
            let Some(callee) = node.event.call_name() else { continue };
            for (index, arg) in node.event.args().iter().enumerate() {
                let bits = match arg.as_string_literal() {
                    Some(text) => (true, is_format_like(text)),
                    None => (false, false),
                };
                ctx.add(
                    ArgKey { callee: callee.to_string(), index },
                    Some(bits),
                    code.to_string(),
                );
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
            let correct: usize =
                per_ctx.iter().filter(|(ctx, _)| ctx.0).map(|(_, codes)| codes.len()).sum();
            for (bits, codes) in per_ctx {
                if bits.0 {
                    continue; // only non-literal contexts are candidate bugs
                }
                let score = correct as f64 / total.len() as f64;
                if score >= config.threshold && score < 1.0 {
                    for code in codes {
                        let mut bonus = score;
                        if *bits == (true, true) {
                            bonus += 0.5;
                        }
                        if is_print(&key.callee) {
                            bonus += 0.3;
                        }
                        reports.push(BugReport::new(
                            Self::NAME,
                            key.to_string(),
                            format!("{bits:?}"),
                            code.clone(),
                            bonus,
                        ));
                    }
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

    #[test]
    fn non_literal_format_arg_is_flagged() {
        let mut ctx: Context<ArgKey, (bool, bool)> = Context::default();
        let key = ArgKey { callee: "printf".to_string(), index: 0 };
        for i in 0..8 {
            ctx.add(key.clone(), Some((true, true)), format!("printf(fmt){i}"));
        }
        ctx.add(key.clone(), Some((false, false)), "printf(user_buf)".to_string());

        let bugs = FsbChecker::merge(vec![ctx], &Config::default());
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].code, "printf(user_buf)");
        assert!(bugs[0].score >= 0.3);
    }
}
