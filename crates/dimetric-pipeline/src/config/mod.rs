//! Pipeline config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use dimetric_core::error::{DimetricError, Result};

pub use schema::{CollectorsSection, CpuCollectorConfig, HandlerConfig, PipelineConfig};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| DimetricError::Io(format!("read config {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PipelineConfig> {
    let cfg: PipelineConfig = serde_yaml::from_str(s)
        .map_err(|e| DimetricError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
