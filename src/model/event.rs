//! Trace events — the nodes hung off each point in an execution path.
//!
//! An `Event`'s identity is its globally unique, monotonically increasing
//! id, not the symbolic value it carries: two `Call` events to `malloc(256)`
//! on different lines of the same trace are distinct events over an equal
//! `Symbol`. Checkers that need value equality compare `.symbol` directly;
//! anything that needs to tell two occurrences apart (e.g. path walking)
//! compares `Event`s themselves.

use std::sync::atomic::{AtomicU64, Ordering};

use super::symbol::Symbol;

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub enum EventKind {
    /// A function call observed on the path. `code` is the raw source
    /// snippet ("evidence code") the frequency stores key evidence on;
    /// the call expression itself lives in `Event::symbol`.
    Call { code: String },
    /// A source location marker. `typ` distinguishes load/store/etc,
    /// `code` is the evidence snippet at this location.
    Location { typ: String, code: String },
    /// A path constraint introduced by a branch. The constrained target
    /// and its bound ranges live in `Event::symbol` as a
    /// `Symbol::Constraint`.
    Assume,
    /// Marks the terminal event of a path.
    EndOfPath,
}

/// One node in an execution path. `symbol` is the expression the trace
/// associates with this event — the call expression for `Call`, the
/// location expression for `Location`, the constraint for `Assume`, or
/// `Symbol::Unknown` for `EndOfPath` and any event whose payload failed
/// to parse.
#[derive(Debug, Clone)]
pub struct Event {
    id: u64,
    pub kind: EventKind,
    pub symbol: Symbol,
}

impl Event {
    pub fn new(kind: EventKind, symbol: Symbol) -> Self {
        Self { id: next_id(), kind, symbol }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// True for a `Call` event whose call expression parsed successfully
    /// into a `Symbol::Call` — mirrors the original's `is_call`, which
    /// additionally requires the parsed call symbol to be present.
    pub fn is_call(&self) -> bool {
        matches!(self.kind, EventKind::Call { .. }) && self.symbol.is_call()
    }

    pub fn is_assume(&self) -> bool {
        matches!(self.kind, EventKind::Assume)
    }

    pub fn is_end_of_path(&self) -> bool {
        matches!(self.kind, EventKind::EndOfPath)
    }

    /// Name of the called function, valid only when `is_call()`.
    pub fn call_name(&self) -> Option<&str> {
        self.symbol.callee_name()
    }

    pub fn args(&self) -> &[Symbol] {
        match &self.symbol {
            Symbol::Call { args, .. } => args,
            _ => &[],
        }
    }

    /// Evidence-code snippet for `Call`/`Location` events.
    pub fn code(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Call { code } => Some(code),
            EventKind::Location { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Identity, not value: two events are the same event iff they are the same
/// occurrence in the trace.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Event {}

impl std::hash::Hash for Event {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
