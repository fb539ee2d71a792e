//! Configuration loader and validator.
//!
//! Layered precedence: built-in defaults, then environment variable
//! overrides. There is no config-file support (the upstream extractor that
//! produces trace files is the only thing with a richer config surface;
//! this core stays deliberately small).

pub mod model;

use crate::errors::ConfigError;
use model::Config;

/// Load [`Config`] from environment variables, falling back to defaults.
///
/// Supported variables (all optional):
/// - `APISAN_THRESHOLD` (float in `(0, 1)`)
/// - `APISAN_MAX_FRAME_BYTES` (u64)
/// - `APISAN_PARALLEL` (bool: `1/0/true/false/yes/no/on/off`)
pub fn load_from_env() -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    if let Some(v) = env_f64("APISAN_THRESHOLD") {
        cfg.threshold = v;
    }
    if let Some(v) = env_u64("APISAN_MAX_FRAME_BYTES") {
        cfg.max_frame_bytes = v;
    }
    if let Some(v) = env_bool("APISAN_PARALLEL") {
        cfg.parallel = v;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|s| {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_threshold() {
        let mut cfg = Config::default();
        cfg.threshold = 1.0;
        assert!(cfg.validate().is_err());
        cfg.threshold = 0.0;
        assert!(cfg.validate().is_err());
    }
}
