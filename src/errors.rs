//! Crate-wide error hierarchy.
//!
//! Mirrors the error kinds named in the design: I/O, framing, document,
//! event, and checker-assertion failures. Each is recovered at the
//! coarsest safe boundary by its caller (tree, then block, then file) —
//! none of these propagate out of [`crate::explorer::Explorer`].

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results produced while decoding one trace file.
pub type TraceResult<T> = std::result::Result<T, TraceError>;

/// Failure while reading or decoding a single trace file or one of its
/// framed blocks. Always recovered by the caller; never aborts a run.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed frame in {path}: {reason}")]
    Framing { path: PathBuf, reason: String },

    #[error("malformed document body in {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("unknown tag '{tag}' while decoding {path}")]
    Event { path: PathBuf, tag: String },

    #[error("frame body in {path} exceeds {limit_bytes} bytes, skipped")]
    TooLarge { path: PathBuf, limit_bytes: u64 },
}

/// Configuration load/validation failures — these are the one category the
/// driver treats as a hard error (non-zero exit), since an unknown checker
/// name or invalid tunable indicates operator error, not data-quality noise.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold must be in (0, 1), got {0}")]
    InvalidThreshold(f64),

    #[error("max_frame_bytes must be > 0")]
    ZeroFrameLimit,

    #[error("unknown checker: {0}")]
    UnknownChecker(String),
}
