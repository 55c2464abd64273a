//! JSON lines handler.
//!
//! One object per metric: `{"name","type","value","dimensions"}` where
//! `dimensions` is already merged with the handler defaults. Keys of
//! `dimensions` are emitted in sorted order so output is diffable.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;

use dimetric_core::error::{DimetricError, Result};
use dimetric_core::{Dimensions, Metric};

use crate::handle::Handler;

#[derive(Serialize)]
struct Line<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    value: f64,
    dimensions: BTreeMap<String, String>,
}

/// Render a single metric as one JSON line (no trailing newline).
pub fn render_line(m: &Metric, defaults: &Dimensions) -> Result<String> {
    let line = Line {
        name: m.name(),
        kind: m.kind.as_str(),
        value: m.value,
        dimensions: m.get_dimensions(defaults).into_iter().collect(),
    };
    serde_json::to_string(&line)
        .map_err(|e| DimetricError::Handler(format!("json encode {} failed: {e}", m.name())))
}

/// Writes go through `spawn_blocking` so a slow file sink does not stall the
/// runtime worker that drives the pipeline.
pub struct JsonHandler {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    defaults: Dimensions,
}

impl JsonHandler {
    pub fn new(out: Box<dyn Write + Send>, defaults: Dimensions) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            defaults,
        }
    }

    pub fn stdout(defaults: Dimensions) -> Self {
        Self::new(Box::new(io::stdout()), defaults)
    }

    /// Append to `path`, creating it if needed.
    pub fn to_file(path: &Path, defaults: Dimensions) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| DimetricError::Io(format!("open {} failed: {e}", path.display())))?;
        Ok(Self::new(Box::new(file), defaults))
    }
}

#[async_trait]
impl Handler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    fn default_dimensions(&self) -> &Dimensions {
        &self.defaults
    }

    async fn handle(&self, metrics: &[Metric]) -> Result<()> {
        let mut buf = String::new();
        for m in metrics {
            buf.push_str(&render_line(m, self.default_dimensions())?);
            buf.push('\n');
        }

        let out = Arc::clone(&self.out);
        tokio::task::spawn_blocking(move || {
            let mut out = out
                .lock()
                .map_err(|_| DimetricError::Internal("json writer lock poisoned".into()))?;
            out.write_all(buf.as_bytes())
                .and_then(|_| out.flush())
                .map_err(|e| DimetricError::Io(format!("json write failed: {e}")))
        })
        .await
        .map_err(|e| DimetricError::Internal(format!("json writer task failed: {e}")))?
    }
}
