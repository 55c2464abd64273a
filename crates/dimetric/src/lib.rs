//! Top-level facade crate for dimetric.
//!
//! Re-exports the metric record and the pipeline library so users can depend on a single crate.

pub mod core {
    pub use dimetric_core::*;
}

pub mod pipeline {
    pub use dimetric_pipeline::*;
}

pub use dimetric_core::{Dimensions, Metric, MetricKind};
