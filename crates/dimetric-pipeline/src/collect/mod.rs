//! Collectors: producers of metric records.

pub mod cpu;

use std::sync::Arc;

use async_trait::async_trait;

use dimetric_core::error::Result;
use dimetric_core::Metric;

use crate::config::CollectorsSection;

pub use cpu::CpuCollector;

/// A source of metrics, polled once per pipeline tick.
#[async_trait]
pub trait Collector: Send + Sync {
    fn name(&self) -> &'static str;
    async fn collect(&self) -> Result<Vec<Metric>>;
}

/// Instantiate every enabled collector.
pub fn build_collectors(cfg: &CollectorsSection) -> Vec<Arc<dyn Collector>> {
    let mut out: Vec<Arc<dyn Collector>> = Vec::new();
    if cfg.cpu.enabled {
        out.push(Arc::new(CpuCollector::new(cfg.cpu.clone())));
    }
    out
}
