//! Core domain types shared by the parser, tree decoder, and checkers.

pub mod bug;
pub mod event;
pub mod symbol;

pub use bug::BugReport;
pub use event::{Event, EventKind};
pub use symbol::{Range, Symbol};
