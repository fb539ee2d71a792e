//! The expression mini-language's typed symbol tree.
//!
//! `Symbol` is a closed tagged union, hashed and compared by its canonical
//! printed form rather than by structural shape — two calls to
//! `malloc(256)` parsed from different call sites are value-equal, even
//! though the `Event`s that produced them are distinct (see `model::event`
//! for why identity and value equality are deliberately split).

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// An inclusive integer range, as bound by a `@=` constraint literal.
pub type Range = (i64, i64);

#[derive(Debug, Clone)]
pub enum Symbol {
    ConcreteInt(i64),
    StringLiteral(String),
    Id(String),
    Field {
        base: Box<Symbol>,
        member: String,
    },
    Array {
        base: Box<Symbol>,
        index: Box<Symbol>,
    },
    BinaryOp {
        lhs: Box<Symbol>,
        op: String,
        rhs: Box<Symbol>,
    },
    Call {
        callee: Box<Symbol>,
        args: Vec<Symbol>,
    },
    Constraint {
        target: Box<Symbol>,
        ranges: Vec<Range>,
    },
    Unknown,
}

impl Symbol {
    /// Name of a `Call`'s callee, if the callee is (or reduces to) a plain
    /// identifier. Checkers key almost entirely off this.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Symbol::Call { callee, .. } => callee.callee_name(),
            Symbol::Id(name) => Some(name),
            _ => None,
        }
    }

    /// Children used by the argument-aliasing analysis: `Call`'s children
    /// are its arguments (the callee is deliberately excluded so that two
    /// calls to different functions over the same argument still compare
    /// related); `Field`/`Array` expose only their base; leaves have none.
    pub fn children(&self) -> Vec<&Symbol> {
        match self {
            Symbol::Call { args, .. } => args.iter().collect(),
            Symbol::Field { base, .. } => vec![base.as_ref()],
            Symbol::Array { base, .. } => vec![base.as_ref()],
            Symbol::BinaryOp { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            Symbol::Constraint { target, .. } => vec![target.as_ref()],
            Symbol::ConcreteInt(_)
            | Symbol::StringLiteral(_)
            | Symbol::Id(_)
            | Symbol::Unknown => vec![],
        }
    }

    /// All `Id` descendants reachable through `children()`, used by the
    /// argument-aliasing checker to test whether two call arguments share
    /// an identifier.
    pub fn id_descendants(&self) -> std::collections::HashSet<Symbol> {
        let mut out = std::collections::HashSet::new();
        let mut stack = vec![self];
        while let Some(sym) = stack.pop() {
            for child in sym.children() {
                stack.push(child);
            }
            if matches!(sym, Symbol::Id(_)) {
                out.insert(sym.clone());
            }
        }
        out
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Symbol::Call { .. })
    }

    pub fn is_concrete_int(&self) -> bool {
        matches!(self, Symbol::ConcreteInt(_))
    }

    pub fn as_concrete_int(&self) -> Option<i64> {
        match self {
            Symbol::ConcreteInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Symbol::StringLiteral(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::ConcreteInt(v) => write!(f, "{v}"),
            Symbol::StringLiteral(s) => write!(f, "\"{s}\""),
            Symbol::Id(name) => write!(f, "{name}"),
            Symbol::Field { base, member } => write!(f, "{base}->{member}"),
            Symbol::Array { base, index } => write!(f, "{base}[{index}]"),
            Symbol::BinaryOp { lhs, op, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Symbol::Call { callee, args } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Symbol::Constraint { target, ranges } => {
                write!(f, "{target} @= {{")?;
                for (i, (lo, hi)) in ranges.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[{lo}, {hi}]")?;
                }
                write!(f, "}}")
            }
            Symbol::Unknown => write!(f, "<unknown>"),
        }
    }
}

/// Equality and hashing are derived entirely from the canonical printed
/// form (see module docs and spec §4.3's canonicalization invariant).
impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_literals_hash_equal() {
        let a = Symbol::Call {
            callee: Box::new(Symbol::Id("malloc".into())),
            args: vec![Symbol::ConcreteInt(256)],
        };
        let b = Symbol::Call {
            callee: Box::new(Symbol::Id("malloc".into())),
            args: vec![Symbol::ConcreteInt(256)],
        };
        assert_eq!(a, b);
        let mut ha = std::collections::hash_map::DefaultHasher::new();
        let mut hb = std::collections::hash_map::DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn call_children_exclude_callee() {
        let call = Symbol::Call {
            callee: Box::new(Symbol::Id("f".into())),
            args: vec![Symbol::Id("x".into()), Symbol::Id("y".into())],
        };
        assert_eq!(call.children().len(), 2);
    }
}
