//! Mines API-misuse bugs from precomputed symbolic-execution trace
//! forests: decodes the trace format, parses call-site expressions into a
//! typed symbol tree, propagates path constraints, and runs a family of
//! statistical checkers that infer expected API usage from majority
//! behavior and flag minority deviations.

pub mod checkers;
pub mod config;
pub mod core;
pub mod errors;
pub mod explorer;
pub mod expr;
pub mod model;
pub mod store;
