//! dimetric core: the metric record handed from collectors to handlers, its
//! kind vocabulary, name sanitization, and the shared error type.
//!
//! The record carries no runtime or I/O dependencies so it can be reused by any
//! producer or consumer in the pipeline.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every operation on [`Metric`] is total: bad names are normalized, missing
//! dimensions are reported as `None`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;

/// Shared result type.
pub use error::{DimetricError, Result};
pub use metric::{sanitize, Dimensions, Metric, MetricKind};
