//! CPU time collector backed by a `/proc/stat`-formatted file.
//!
//! Parsing rules:
//! - Only lines whose first token starts with `cpu` are read.
//! - `cpu` is the aggregate line, `cpuN` is core `N`.
//! - Missing trailing columns (older kernels) are simply absent.

use std::time::Duration;

use async_trait::async_trait;

use dimetric_core::error::{DimetricError, Result};
use dimetric_core::{Metric, MetricKind};

use crate::collect::Collector;
use crate::config::CpuCollectorConfig;

/// Column names of a cpu line, in kernel order.
pub const CPU_STATS: [&str; 10] = [
    "user",
    "nice",
    "system",
    "idle",
    "iowait",
    "irq",
    "softirq",
    "steal",
    "guest",
    "guest_nice",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuLabel {
    Total,
    Core(u32),
}

/// One parsed cpu line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuTimes {
    pub label: CpuLabel,
    /// Jiffies per column, indexed like [`CPU_STATS`].
    pub values: Vec<u64>,
}

impl CpuTimes {
    fn get(&self, stat: usize) -> Option<u64> {
        self.values.get(stat).copied()
    }
}

pub fn parse_proc_stat(text: &str) -> Result<Vec<CpuTimes>> {
    let mut out = Vec::new();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let Some(head) = fields.next() else {
            continue;
        };
        let Some(suffix) = head.strip_prefix("cpu") else {
            continue;
        };

        let label = if suffix.is_empty() {
            CpuLabel::Total
        } else {
            let id = suffix
                .parse::<u32>()
                .map_err(|e| DimetricError::Parse(format!("invalid cpu label {head}: {e}")))?;
            CpuLabel::Core(id)
        };

        let values = fields
            .take(CPU_STATS.len())
            .map(|f| {
                f.parse::<u64>()
                    .map_err(|e| DimetricError::Parse(format!("invalid {head} field {f}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        out.push(CpuTimes { label, values });
    }
    Ok(out)
}

/// Busy percentage between two samples of the same cpu line, computed over
/// the user, nice, system and idle columns.
pub fn busy_percent(before: &CpuTimes, after: &CpuTimes) -> Result<f64> {
    if before.values.len() < 4 || after.values.len() < 4 {
        return Err(DimetricError::Parse("cpu line has fewer than 4 columns".into()));
    }
    let delta: Vec<f64> = (0..4)
        .map(|i| after.values[i].saturating_sub(before.values[i]) as f64)
        .collect();
    let total: f64 = delta.iter().sum();
    if total == 0.0 {
        return Ok(0.0);
    }
    Ok(100.0 - (delta[3] * 100.0 / total))
}

pub struct CpuCollector {
    cfg: CpuCollectorConfig,
}

impl CpuCollector {
    pub fn new(cfg: CpuCollectorConfig) -> Self {
        Self { cfg }
    }

    async fn read(&self) -> Result<Vec<CpuTimes>> {
        let text = tokio::fs::read_to_string(&self.cfg.proc_path)
            .await
            .map_err(|e| {
                DimetricError::Io(format!("read {} failed: {e}", self.cfg.proc_path.display()))
            })?;
        parse_proc_stat(&text)
    }

    async fn read_total(&self) -> Result<CpuTimes> {
        self.read()
            .await?
            .into_iter()
            .find(|t| t.label == CpuLabel::Total)
            .ok_or_else(|| DimetricError::Parse("no aggregate cpu line".into()))
    }

    async fn collect_simple(&self) -> Result<Vec<Metric>> {
        let before = self.read_total().await?;
        tokio::time::sleep(Duration::from_millis(self.cfg.sample_interval_ms)).await;
        let after = self.read_total().await?;

        let pct = busy_percent(&before, &after)?;
        Ok(vec![Metric::new("cpu.percent").with_value(pct)])
    }

    /// Turn one sample into cumulative counters.
    pub fn metrics_from(&self, times: &[CpuTimes]) -> Vec<Metric> {
        let ncores = times
            .iter()
            .filter(|t| matches!(t.label, CpuLabel::Core(_)))
            .count();

        let mut out = Vec::new();
        for t in times {
            let (prefix, core, divisor) = match t.label {
                CpuLabel::Total => {
                    let divisor = if self.cfg.normalize && ncores > 0 {
                        ncores as f64
                    } else {
                        1.0
                    };
                    ("cpu.total", None, divisor)
                }
                CpuLabel::Core(id) => {
                    if !self.cfg.percore {
                        continue;
                    }
                    ("cpu", Some(id.to_string()), 1.0)
                }
            };

            for (stat, value) in self.stats(t) {
                let mut m = Metric::new(&format!("{prefix}.{stat}"))
                    .with_kind(MetricKind::CumulativeCounter)
                    .with_value(value / divisor);
                if let Some(core) = &core {
                    m.add_dimension("core", core);
                }
                out.push(m);
            }
        }
        out
    }

    fn stats(&self, t: &CpuTimes) -> Vec<(&'static str, f64)> {
        let mut out: Vec<(&'static str, f64)> = CPU_STATS
            .iter()
            .zip(&t.values)
            .map(|(name, v)| (*name, *v as f64))
            .collect();

        if self.cfg.enable_aggregation {
            if let (Some(user), Some(nice)) = (t.get(0), t.get(1)) {
                out.push(("user_mode", user as f64 + nice as f64));
            }
            if let (Some(irq), Some(softirq)) = (t.get(5), t.get(6)) {
                out.push(("irq_softirq", irq as f64 + softirq as f64));
            }
        }
        out
    }
}

#[async_trait]
impl Collector for CpuCollector {
    fn name(&self) -> &'static str {
        "cpu"
    }

    async fn collect(&self) -> Result<Vec<Metric>> {
        if self.cfg.simple {
            return self.collect_simple().await;
        }
        let times = self.read().await?;
        let metrics = self.metrics_from(&times);
        tracing::debug!(lines = times.len(), metrics = metrics.len(), "cpu sample collected");
        Ok(metrics)
    }
}
