//! Config loader (strict parsing).

pub mod schema;

use std::fs;

use plural_gate_core::error::{GateError, Result};

pub use schema::{GateConfig, GatekeeperSection, HostSection, SidecarSection};

pub fn load_from_file(path: &str) -> Result<GateConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GateConfig> {
    let cfg: GateConfig = serde_yaml::from_str(s)
        .map_err(|e| GateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
