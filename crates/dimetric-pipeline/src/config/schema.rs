use std::path::PathBuf;

use serde::Deserialize;
use dimetric_core::error::{DimetricError, Result};
use dimetric_core::Dimensions;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub version: u32,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Applied by every handler; a handler's own defaults take precedence.
    #[serde(default)]
    pub default_dimensions: Dimensions,

    #[serde(default)]
    pub collectors: CollectorsSection,

    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DimetricError::UnsupportedVersion);
        }
        if !(1000..=3_600_000).contains(&self.interval_ms) {
            return Err(DimetricError::InvalidConfig(
                "interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        if self.handlers.is_empty() {
            return Err(DimetricError::InvalidConfig("handlers must not be empty".into()));
        }

        self.collectors.cpu.validate()?;

        Ok(())
    }

    /// Pipeline defaults overlaid with the handler's own defaults.
    pub fn effective_defaults(&self, handler: &HandlerConfig) -> Dimensions {
        let mut out = self.default_dimensions.clone();
        out.extend(
            handler
                .default_dimensions()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        out
    }
}

fn default_interval_ms() -> u64 {
    10_000
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorsSection {
    #[serde(default)]
    pub cpu: CpuCollectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpuCollectorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Publish per-core series in addition to the total.
    #[serde(default = "default_true")]
    pub percore: bool,

    /// Only publish the aggregate busy percentage.
    #[serde(default)]
    pub simple: bool,

    /// Divide the totals by the number of cores.
    #[serde(default)]
    pub normalize: bool,

    /// Also publish `user_mode` and `irq_softirq`.
    #[serde(default)]
    pub enable_aggregation: bool,

    #[serde(default = "default_proc_path")]
    pub proc_path: PathBuf,

    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
}

impl Default for CpuCollectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            percore: default_true(),
            simple: false,
            normalize: false,
            enable_aggregation: false,
            proc_path: default_proc_path(),
            sample_interval_ms: default_sample_interval_ms(),
        }
    }
}

impl CpuCollectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.simple && !(10..=60_000).contains(&self.sample_interval_ms) {
            return Err(DimetricError::InvalidConfig(
                "collectors.cpu.sample_interval_ms must be between 10 and 60000".into(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_proc_path() -> PathBuf {
    PathBuf::from("/proc/stat")
}
fn default_sample_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum HandlerConfig {
    Log {
        #[serde(default)]
        default_dimensions: Dimensions,
    },
    Json {
        /// `None` writes to stdout.
        #[serde(default)]
        path: Option<PathBuf>,
        #[serde(default)]
        default_dimensions: Dimensions,
    },
    Memory {
        #[serde(default)]
        default_dimensions: Dimensions,
    },
}

impl HandlerConfig {
    pub fn default_dimensions(&self) -> &Dimensions {
        match self {
            HandlerConfig::Log { default_dimensions }
            | HandlerConfig::Json { default_dimensions, .. }
            | HandlerConfig::Memory { default_dimensions } => default_dimensions,
        }
    }
}
