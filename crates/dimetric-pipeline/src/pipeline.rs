//! Collector → handler fan-out.
//!
//! Each tick polls every collector concurrently, concatenates the results, and
//! hands the same batch to every handler. A failing collector or handler is
//! logged and skipped; it never stops the others.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::MissedTickBehavior;

use dimetric_core::error::Result;
use dimetric_core::Metric;

use crate::collect::{build_collectors, Collector};
use crate::config::PipelineConfig;
use crate::handle::{build_handlers, Handler};

pub struct Pipeline {
    interval: Duration,
    collectors: Vec<Arc<dyn Collector>>,
    handlers: Vec<Arc<dyn Handler>>,
}

impl Pipeline {
    pub fn new(
        interval: Duration,
        collectors: Vec<Arc<dyn Collector>>,
        handlers: Vec<Arc<dyn Handler>>,
    ) -> Self {
        Self {
            interval,
            collectors,
            handlers,
        }
    }

    pub fn from_config(cfg: &PipelineConfig) -> Result<Self> {
        let collectors = build_collectors(&cfg.collectors);
        let handlers = build_handlers(cfg)?;
        for h in &handlers {
            let mut defaults: Vec<_> = h.default_dimensions().iter().collect();
            defaults.sort();
            tracing::info!(handler = h.name(), defaults = ?defaults, "handler ready");
        }
        if collectors.is_empty() {
            tracing::warn!("no collectors enabled; pipeline will emit nothing");
        }
        Ok(Self::new(
            Duration::from_millis(cfg.interval_ms),
            collectors,
            handlers,
        ))
    }

    /// One collect/emit round. Returns the number of metrics in the batch.
    pub async fn run_once(&self) -> usize {
        let results = join_all(self.collectors.iter().map(|c| c.collect())).await;

        let mut batch: Vec<Metric> = Vec::new();
        for (c, res) in self.collectors.iter().zip(results) {
            match res {
                Ok(mut ms) => batch.append(&mut ms),
                Err(e) => {
                    tracing::warn!(collector = c.name(), code = e.code().as_str(), error = %e, "collect failed");
                }
            }
        }

        let results = join_all(self.handlers.iter().map(|h| h.handle(&batch))).await;
        for (h, res) in self.handlers.iter().zip(results) {
            if let Err(e) = res {
                tracing::warn!(handler = h.name(), code = e.code().as_str(), error = %e, "handle failed");
            }
        }

        tracing::debug!(metrics = batch.len(), "tick done");
        batch.len()
    }

    /// Tick until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            collectors = self.collectors.len(),
            handlers = self.handlers.len(),
            "pipeline started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }

        tracing::info!("pipeline stopped");
    }
}
