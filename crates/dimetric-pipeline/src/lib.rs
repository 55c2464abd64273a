//! dimetric pipeline library entry.
//!
//! This crate wires config, collectors, and handlers into a polling pipeline.
//! It is consumed by the binary (`main.rs`) and by integration tests.

pub mod collect;
pub mod config;
pub mod handle;
pub mod pipeline;

pub use pipeline::Pipeline;
