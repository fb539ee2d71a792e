//! Configuration data structures for the trace-mining pipeline.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Top-level tunables for the pipeline. See module docs for env overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum majority fraction at which a minority deviation becomes a
    /// candidate bug. Must lie strictly between 0 and 1.
    pub threshold: f64,

    /// Framed blocks larger than this are skipped with a warning.
    pub max_frame_bytes: u64,

    /// Integer-overflow checker's default symbolic range, inclusive.
    pub int_overflow_limit: (i64, i64),

    /// Whether the explorer processes files across a worker pool sized to
    /// the machine's CPU count, or sequentially in the current thread.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            max_frame_bytes: 1024 * 1024 * 1024,
            int_overflow_limit: (0, u32::MAX as i64),
            parallel: true,
        }
    }
}

impl Config {
    /// Basic validation — ensures tunables are internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.max_frame_bytes == 0 {
            return Err(ConfigError::ZeroFrameLimit);
        }
        Ok(())
    }
}
