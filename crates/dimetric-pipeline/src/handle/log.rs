use async_trait::async_trait;

use dimetric_core::error::Result;
use dimetric_core::{Dimensions, Metric};

use crate::handle::Handler;

/// Emit each metric as a `tracing` event. Handy for local runs.
pub struct LogHandler {
    defaults: Dimensions,
}

impl LogHandler {
    pub fn new(defaults: Dimensions) -> Self {
        Self { defaults }
    }
}

#[async_trait]
impl Handler for LogHandler {
    fn name(&self) -> &'static str {
        "log"
    }

    fn default_dimensions(&self) -> &Dimensions {
        &self.defaults
    }

    async fn handle(&self, metrics: &[Metric]) -> Result<()> {
        for m in metrics {
            let mut dims: Vec<_> = m.get_dimensions(self.default_dimensions()).into_iter().collect();
            dims.sort();
            tracing::info!(
                name = %m.name(),
                kind = %m.kind,
                value = m.value,
                dimensions = ?dims,
                "metric"
            );
        }
        Ok(())
    }
}
