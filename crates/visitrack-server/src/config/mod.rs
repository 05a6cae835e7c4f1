//! Server config loader (strict parsing, environment overrides).

pub mod schema;

use std::env;
use std::fs;

use visitrack_core::error::{LedgerError, Result};

pub use schema::{CorsSection, ServerConfig, ServerSection};

/// Names a YAML config file. Optional; defaults apply when unset.
pub const CONFIG_PATH_ENV: &str = "VISITRACK_CONFIG";

/// Overrides `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Load config the way the binary does: optional file, then environment.
pub fn load() -> Result<ServerConfig> {
    let cfg = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            tracing::info!(%path, "loading config file");
            load_from_file(&path)?
        }
        Err(_) => ServerConfig::default(),
    };
    cfg.apply_env(|key| env::var(key).ok())
}

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| LedgerError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| LedgerError::InvalidRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
