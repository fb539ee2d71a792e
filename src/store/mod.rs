//! The generic frequency-store/context framework shared by every checker.

pub mod context;
pub mod frequency;

pub use context::{Context, RawBug};
pub use frequency::{Store1, Store2};
