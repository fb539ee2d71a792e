//! Checker framework: keyword-based rank heuristics, the shared
//! per-path-visit trait every strategy implements, and the registry that
//! maps a checker's CLI name to its type (§4.7).

pub mod args;
pub mod causality;
pub mod condition;
pub mod fsb;
pub mod intovfl;
pub mod retval;

use crate::config::model::Config;
use crate::core::{ExecNode, ExecTree};
use crate::model::{BugReport, Range};

/// Case-insensitive substring keyword sets used by rank bonuses. Matching
/// is intentionally crude — a fixed keyword list over the callee name,
/// not a semantic analysis.
mod rank_utils {
    const ALLOC: &[&str] = &["alloc", "_new", "clone", "create", "dup"];
    const DEALLOC: &[&str] = &["free", "release"];
    const LOCK: &[&str] = &["_lock"];
    const UNLOCK: &[&str] = &["_unlock"];
    const PRINT: &[&str] = &["print"];

    fn has_keyword(name: &str, keywords: &[&str]) -> bool {
        let lower = name.to_ascii_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    }

    pub fn is_alloc(name: &str) -> bool {
        has_keyword(name, ALLOC)
    }
    pub fn is_dealloc(name: &str) -> bool {
        has_keyword(name, DEALLOC)
    }
    pub fn is_lock(name: &str) -> bool {
        has_keyword(name, LOCK)
    }
    pub fn is_unlock(name: &str) -> bool {
        has_keyword(name, UNLOCK)
    }
    pub fn is_print(name: &str) -> bool {
        has_keyword(name, PRINT)
    }
}
pub use rank_utils::{is_alloc, is_dealloc, is_lock, is_print, is_unlock};

/// Renders a constraint's immutable range-list as a context key, or
/// `None` when the target carries no binding — distinct from the empty
/// string, since "unconstrained" must never collide with an
/// actually-empty range-list.
pub fn render_ranges(ranges: Option<&[Range]>) -> Option<String> {
    ranges.map(|rs| {
        rs.iter().map(|(lo, hi)| format!("[{lo},{hi}]")).collect::<Vec<_>>().join(",")
    })
}

/// A call-keyed usage, shared by the format-string and integer-overflow
/// checkers, both of which key on (callee name, argument position).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgKey {
    pub callee: String,
    pub index: usize,
}

impl std::fmt::Display for ArgKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.callee, self.index)
    }
}

/// One strategy's contribution to the framework: how it populates its
/// context while visiting a path, and how it turns merged contexts into
/// ranked bug reports.
pub trait CheckerImpl {
    type Ctx: Default + Clone + Send;
    const NAME: &'static str;

    fn process_path(path: &[&ExecNode], ctx: &mut Self::Ctx);
    fn merge(ctxs: Vec<Self::Ctx>, config: &Config) -> Vec<BugReport>;
}

/// Runs one checker's path-visit hook over every path of `tree`, using the
/// iterative walker in `core::tree` (never recursion — input depth is
/// untrusted).
pub fn process_tree<C: CheckerImpl>(tree: &ExecTree) -> C::Ctx {
    let mut ctx = C::Ctx::default();
    tree.walk_paths(|path_ids| {
        let path: Vec<&ExecNode> = path_ids.iter().map(|&id| &tree.nodes[id]).collect();
        C::process_path(&path, &mut ctx);
    });
    ctx
}

/// The six checker strategies, addressable by their CLI name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerKind {
    RetVal,
    Causality,
    Condition,
    Fsb,
    Args,
    IntOvfl,
}

impl CheckerKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "rvchk" => Self::RetVal,
            "cpair" => Self::Causality,
            "cond" => Self::Condition,
            "fsb" => Self::Fsb,
            "args" => Self::Args,
            "intovfl" => Self::IntOvfl,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RetVal => "rvchk",
            Self::Causality => "cpair",
            Self::Condition => "cond",
            Self::Fsb => "fsb",
            Self::Args => "args",
            Self::IntOvfl => "intovfl",
        }
    }

    pub const ALL: &'static [&'static str] =
        &["rvchk", "cpair", "cond", "fsb", "args", "intovfl"];
}
