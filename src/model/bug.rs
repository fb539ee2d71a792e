//! The report a checker emits for a single suspected API misuse.
//!
//! Mirrors the original's flat `(score, code, key, ctx)` shape exactly —
//! `key`/`ctx` are kept as their already-rendered display form rather than
//! typed payloads, since by the time a `BugReport` exists the checker has
//! already used the typed key/context to decide bonuses and has nothing
//! further to do with them but print.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct BugReport {
    /// Name of the checker that produced this report (`"rvchk"`, `"cpair"`, …).
    pub checker: &'static str,
    /// The usage key this bug deviates from (e.g. a callee name).
    pub key: String,
    /// The context under which the deviation was observed, or empty for
    /// checkers whose context is unit (`⊥`).
    pub ctx: String,
    /// The evidence-code snippet identifying the offending call site.
    pub code: String,
    /// Severity score; higher is more confident. Not bounded to `[0, 1]` —
    /// rank bonuses can push it past 1.0.
    pub score: f64,
}

impl BugReport {
    pub fn new(
        checker: &'static str,
        key: impl Into<String>,
        ctx: impl Into<String>,
        code: impl Into<String>,
        score: f64,
    ) -> Self {
        Self { checker, key: key.into(), ctx: ctx.into(), code: code.into(), score }
    }
}

impl fmt::Display for BugReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BugReport(checker={}, score={:.2}, code={}, key={}, ctx={})",
            self.checker, self.score, self.code, self.key, self.ctx
        )
    }
}
