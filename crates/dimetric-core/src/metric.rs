//! The metric record.
//!
//! A [`Metric`] is a single named, typed, dimensioned data point. Collectors
//! create and populate it; handlers read it and resolve its dimensions against
//! their own defaults before emitting it downstream.
//!
//! Names, dimension names, and dimension values pass through [`sanitize`] at
//! every entry point, so `=` and `:` never reach downstream line formats.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dimension name to dimension value.
pub type Dimensions = HashMap<String, String>;

/// Replace every `=` and `:` with `-`.
pub fn sanitize(s: &str) -> String {
    s.replace(['=', ':'], "-")
}

/// Classification of a metric.
///
/// Unknown strings are kept as [`MetricKind::Other`] rather than rejected;
/// deciding whether a custom kind is acceptable is up to the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricKind {
    /// Point-in-time value.
    #[default]
    Gauge,
    /// Count since the last report.
    Counter,
    /// Monotonically increasing count that may reset.
    CumulativeCounter,
    /// Anything else an external system hands us.
    Other(String),
}

impl MetricKind {
    pub fn as_str(&self) -> &str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
            MetricKind::CumulativeCounter => "cumulative_counter",
            MetricKind::Other(s) => s.as_str(),
        }
    }
}

impl FromStr for MetricKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gauge" => MetricKind::Gauge,
            "counter" => MetricKind::Counter,
            // "cumcounter" is the short spelling some collectors still send
            "cumulative_counter" | "cumcounter" => MetricKind::CumulativeCounter,
            other => MetricKind::Other(other.to_string()),
        })
    }
}

impl From<String> for MetricKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<MetricKind> for String {
    fn from(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single measurement produced by a collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMetric")]
pub struct Metric {
    name: String,
    /// Caller-assigned classification; defaults to gauge.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub value: f64,
    dimensions: Dimensions,
}

impl Metric {
    /// New gauge with value `0.0` and no dimensions.
    pub fn new(name: &str) -> Self {
        Self {
            name: sanitize(name),
            kind: MetricKind::Gauge,
            value: 0.0,
            dimensions: Dimensions::new(),
        }
    }

    pub fn with_kind(mut self, kind: MetricKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_dimension(mut self, name: &str, value: &str) -> Self {
        self.add_dimension(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The record's own dimensions, without any defaults applied.
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Attach a dimension. An existing dimension of the same (sanitized) name
    /// is overwritten.
    pub fn add_dimension(&mut self, name: &str, value: &str) {
        self.dimensions.insert(sanitize(name), sanitize(value));
    }

    /// Own dimensions merged with `defaults`; on conflict the default wins.
    ///
    /// Always returns a fresh map. `defaults` is taken as-is (no sanitization).
    pub fn get_dimensions(&self, defaults: &Dimensions) -> Dimensions {
        let mut merged = self.dimensions.clone();
        merged.extend(defaults.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Look up one dimension in the merged view of [`Metric::get_dimensions`].
    ///
    /// `dimension` is sanitized before the lookup.
    pub fn get_dimension_value(&self, dimension: &str, defaults: &Dimensions) -> Option<String> {
        let key = sanitize(dimension);
        defaults
            .get(&key)
            .or_else(|| self.dimensions.get(&key))
            .cloned()
    }
}

/// Unchecked wire shape; converted through the sanitizing constructors.
#[derive(Deserialize)]
struct RawMetric {
    name: String,
    #[serde(rename = "type", default)]
    kind: MetricKind,
    #[serde(default)]
    value: f64,
    #[serde(default)]
    dimensions: Dimensions,
}

impl From<RawMetric> for Metric {
    fn from(raw: RawMetric) -> Self {
        let mut m = Metric::new(&raw.name)
            .with_kind(raw.kind)
            .with_value(raw.value);
        for (k, v) in &raw.dimensions {
            m.add_dimension(k, v);
        }
        m
    }
}
