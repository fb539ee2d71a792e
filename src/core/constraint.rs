//! Per-path constraint propagation (§4.4).
//!
//! A `ConstraintMgr` is an immutable, `Rc`-shared mapping from a bound
//! `Symbol` to its inclusive range-list. Deriving a child's manager is
//! functional update: if the parent's event doesn't introduce a new
//! binding, the child inherits the parent's `Rc` directly (no allocation);
//! only the first `Assume` binding for a given symbol allocates a new map,
//! cloning the parent's entries into it. Rebinding an already-bound symbol
//! is a deliberate no-op ("first-binding-wins") — empirically, honoring a
//! later rebind produced false positives in the upstream tool.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::model::event::EventKind;
use crate::model::{Event, Range, Symbol};

#[derive(Debug, Default, Clone)]
pub struct ConstraintMgr {
    bindings: Rc<BTreeMap<BoundKey, Vec<Range>>>,
}

/// Symbols are keyed by canonical form, matching their `Hash`/`Eq` impl,
/// but `BTreeMap` needs `Ord`; wrap the printed form directly so lookups
/// are cheap comparisons over a `String`-backed key.
type BoundKey = String;

impl ConstraintMgr {
    /// Looks up the range-list bound to `symbol`, if any.
    pub fn get(&self, symbol: &Symbol) -> Option<&[Range]> {
        self.bindings.get(&symbol.to_string()).map(Vec::as_slice)
    }

    /// Produces the manager that `event`'s children should inherit: a new,
    /// extended manager if `event` is an `Assume` binding a symbol not
    /// already bound here; otherwise a cheap `Rc` clone of `self`.
    pub fn advance(&self, event: &Event) -> ConstraintMgr {
        if !matches!(event.kind, EventKind::Assume) {
            return self.clone();
        }
        let Symbol::Constraint { target, ranges } = &event.symbol else {
            return self.clone();
        };
        let key = target.to_string();
        if self.bindings.contains_key(&key) {
            return self.clone();
        }
        let mut extended = (*self.bindings).clone();
        extended.insert(key, ranges.clone());
        ConstraintMgr { bindings: Rc::new(extended) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::symbol::Symbol;

    fn assume(target: Symbol, ranges: Vec<Range>) -> Event {
        let constraint = Symbol::Constraint { target: Box::new(target), ranges };
        Event::new(EventKind::Assume, constraint)
    }

    #[test]
    fn first_binding_wins_over_later_rebind() {
        let root = ConstraintMgr::default();
        let x = Symbol::Id("x".into());

        let after_first = root.advance(&assume(x.clone(), vec![(0, 10)]));
        let after_second = after_first.advance(&assume(x.clone(), vec![(20, 30)]));

        assert_eq!(after_second.get(&x), Some(&[(0, 10)][..]));
    }

    #[test]
    fn unrelated_events_inherit_by_reference() {
        let root = ConstraintMgr::default();
        let x = Symbol::Id("x".into());
        let bound = root.advance(&assume(x.clone(), vec![(0, 10)]));

        let end = Event::new(EventKind::EndOfPath, Symbol::Unknown);
        let inherited = bound.advance(&end);

        assert!(Rc::ptr_eq(&bound.bindings, &inherited.bindings));
    }
}
