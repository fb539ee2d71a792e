//! Trace decoding: the file reader, document decoder, execution-tree
//! shape, and constraint propagation/path-walking passes over it.

pub mod constraint;
pub mod decoder;
pub mod trace_reader;
pub mod tree;

pub use constraint::ConstraintMgr;
pub use tree::{ExecNode, ExecTree, NodeId};
