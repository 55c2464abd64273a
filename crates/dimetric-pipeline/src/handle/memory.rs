//! In-memory last-value store.
//!
//! Series are keyed by name plus the merged dimensions, so the same metric
//! from two cores lands in two entries. Default dimension values are not
//! sanitized, so the key stays structured instead of being flattened into a
//! single string.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;

use dimetric_core::error::Result;
use dimetric_core::{Dimensions, Metric, MetricKind};

use crate::handle::Handler;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub kind: MetricKind,
    pub value: f64,
    pub dimensions: BTreeMap<String, String>,
}

type SeriesKey = (String, BTreeMap<String, String>);

#[derive(Default)]
pub struct MemoryHandler {
    series: DashMap<SeriesKey, Sample>,
    defaults: Dimensions,
}

impl MemoryHandler {
    pub fn new(defaults: Dimensions) -> Self {
        Self {
            series: DashMap::new(),
            defaults,
        }
    }

    /// Latest sample for `name` with exactly these merged dimensions.
    pub fn get(&self, name: &str, dims: &[(&str, &str)]) -> Option<Sample> {
        let dims: BTreeMap<String, String> = dims
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.series
            .get(&(name.to_string(), dims))
            .map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[async_trait]
impl Handler for MemoryHandler {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn default_dimensions(&self) -> &Dimensions {
        &self.defaults
    }

    async fn handle(&self, metrics: &[Metric]) -> Result<()> {
        for m in metrics {
            let dimensions: BTreeMap<String, String> = m
                .get_dimensions(self.default_dimensions())
                .into_iter()
                .collect();
            self.series.insert(
                (m.name().to_string(), dimensions.clone()),
                Sample {
                    kind: m.kind.clone(),
                    value: m.value,
                    dimensions,
                },
            );
        }
        Ok(())
    }
}
