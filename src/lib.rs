//! # factory-spc
//!
//! Statistical process control (SPC) for scalar sensor readings: control
//! limits, CUSUM drift, outlier detection, and declarative chart
//! descriptions.
//!
//! Every routine is a pure function of its input sequence. Sequences are
//! analyzed in the order given, which should be oldest first; see
//! [`reading::ReadingSeries`] for reordering storage results.
//!
//! ## Modules
//!
//! - [`spc`] — 3-sigma limits and X-bar/R subgroup limits (n=2..10)
//! - [`detection`] — one-sided CUSUM, z-score and IQR outliers
//! - [`charts`] — X-bar, CUSUM, heatmap, and Pareto chart descriptions
//! - [`query`] — statistics, anomaly, and chart queries for boundary layers
//! - [`digest`] — per-sensor aggregates and anomaly findings
//! - [`reading`] — reading model and chronological series
//! - [`config`] — per-call analysis parameters
//! - [`error`] — error types
//!
//! ## Design Philosophy
//!
//! - **No hidden state**: nothing is cached or retained between calls
//! - **Fallbacks over failures**: degenerate inputs give zeroed limits,
//!   empty index lists, or the empty chart, never NaN
//! - **Render-free charts**: charts are plain serde data for an external
//!   plotting library

pub mod charts;
pub mod config;
pub mod detection;
pub mod digest;
pub mod error;
pub mod query;
pub mod reading;
pub mod spc;
mod summary;

pub use error::{Result, SpcError};
