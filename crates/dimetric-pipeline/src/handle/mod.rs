//! Handlers: consumers that resolve dimensions against their defaults and
//! emit metrics downstream.

pub mod json;
pub mod log;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use dimetric_core::error::Result;
use dimetric_core::{Dimensions, Metric};

use crate::config::{HandlerConfig, PipelineConfig};

pub use json::JsonHandler;
pub use log::LogHandler;
pub use memory::MemoryHandler;

#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str;
    /// Dimensions merged into every metric this handler emits (they win on conflict).
    fn default_dimensions(&self) -> &Dimensions;
    async fn handle(&self, metrics: &[Metric]) -> Result<()>;
}

/// Instantiate every configured handler with its effective defaults.
pub fn build_handlers(cfg: &PipelineConfig) -> Result<Vec<Arc<dyn Handler>>> {
    let mut out: Vec<Arc<dyn Handler>> = Vec::with_capacity(cfg.handlers.len());
    for h in &cfg.handlers {
        let defaults = cfg.effective_defaults(h);
        let handler: Arc<dyn Handler> = match h {
            HandlerConfig::Log { .. } => Arc::new(LogHandler::new(defaults)),
            HandlerConfig::Json { path: Some(path), .. } => {
                Arc::new(JsonHandler::to_file(path, defaults)?)
            }
            HandlerConfig::Json { path: None, .. } => Arc::new(JsonHandler::stdout(defaults)),
            HandlerConfig::Memory { .. } => Arc::new(MemoryHandler::new(defaults)),
        };
        out.push(handler);
    }
    Ok(out)
}
