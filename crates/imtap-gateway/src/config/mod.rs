//! Config loader (strict parsing).

pub mod schema;

use std::fs;

use imtap_core::error::{ImTapError, Result};

pub use schema::{DispatchSection, HandlersSection, OverflowPolicy, ServerSection, TapConfig};

/// Env var overriding the config path.
pub const CONFIG_ENV: &str = "IMTAP_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "imtap.yaml";

pub fn load_from_file(path: &str) -> Result<TapConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ImTapError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<TapConfig> {
    let cfg: TapConfig = serde_yaml::from_str(s)
        .map_err(|e| ImTapError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Path from `IMTAP_CONFIG`, else `imtap.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
