#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use dimetric_core::error::{DimetricError, Result};
use dimetric_core::{Dimensions, Metric, MetricKind};
use dimetric_pipeline::collect::{Collector, CpuCollector};
use dimetric_pipeline::config::CpuCollectorConfig;
use dimetric_pipeline::handle::{Handler, MemoryHandler};
use dimetric_pipeline::Pipeline;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/proc_stat")
}

struct Broken;

#[async_trait]
impl Collector for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn collect(&self) -> Result<Vec<Metric>> {
        Err(DimetricError::Io("source unavailable".into()))
    }
}

struct Rejecting {
    defaults: Dimensions,
}

#[async_trait]
impl Handler for Rejecting {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn default_dimensions(&self) -> &Dimensions {
        &self.defaults
    }

    async fn handle(&self, _metrics: &[Metric]) -> Result<()> {
        Err(DimetricError::Handler("downstream refused".into()))
    }
}

#[tokio::test]
async fn cpu_fixture_reaches_memory_handler() {
    let cpu = CpuCollector::new(CpuCollectorConfig {
        proc_path: fixture(),
        ..CpuCollectorConfig::default()
    });

    let mut defaults = Dimensions::new();
    defaults.insert("host".into(), "test-box".into());
    let mem = Arc::new(MemoryHandler::new(defaults));

    let collectors: Vec<Arc<dyn Collector>> = vec![Arc::new(cpu), Arc::new(Broken)];
    let rejecting = Rejecting {
        defaults: Dimensions::new(),
    };
    let handlers: Vec<Arc<dyn Handler>> = vec![Arc::new(rejecting), mem.clone()];
    let pipeline = Pipeline::new(Duration::from_secs(1), collectors, handlers);

    let n = pipeline.run_once().await;
    assert_eq!(n, 30);
    assert_eq!(mem.len(), 30);

    let s = mem.get("cpu.total.user", &[("host", "test-box")]).unwrap();
    assert_eq!(s.value, 4705.0);
    assert_eq!(s.kind, MetricKind::CumulativeCounter);

    let s = mem
        .get("cpu.idle", &[("core", "1"), ("host", "test-box")])
        .unwrap();
    assert_eq!(s.value, 1850.0);
}

#[tokio::test]
async fn simple_mode_publishes_one_gauge() {
    let cpu = CpuCollector::new(CpuCollectorConfig {
        proc_path: fixture(),
        simple: true,
        sample_interval_ms: 10,
        ..CpuCollectorConfig::default()
    });

    // same file twice: no delta, so 0% busy
    let ms = cpu.collect().await.unwrap();
    assert_eq!(ms.len(), 1);
    assert_eq!(ms[0].name(), "cpu.percent");
    assert_eq!(ms[0].kind, MetricKind::Gauge);
    assert_eq!(ms[0].value, 0.0);
}

#[tokio::test]
async fn missing_proc_file_is_io_error() {
    let cpu = CpuCollector::new(CpuCollectorConfig {
        proc_path: PathBuf::from("/nonexistent/proc/stat"),
        ..CpuCollectorConfig::default()
    });
    let err = cpu.collect().await.unwrap_err();
    assert_eq!(err.code().as_str(), "IO");
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let mem = Arc::new(MemoryHandler::default());
    let cpu = CpuCollector::new(CpuCollectorConfig {
        proc_path: fixture(),
        percore: false,
        ..CpuCollectorConfig::default()
    });
    let collectors: Vec<Arc<dyn Collector>> = vec![Arc::new(cpu)];
    let handlers: Vec<Arc<dyn Handler>> = vec![mem.clone()];
    let pipeline = Pipeline::new(Duration::from_millis(5), collectors, handlers);

    pipeline.run(tokio::time::sleep(Duration::from_millis(50))).await;
    assert_eq!(mem.len(), 10);
}
