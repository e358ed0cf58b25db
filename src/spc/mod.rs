//! Statistical Process Control (SPC) limits.
//!
//! # Limits
//!
//! - [`simple_limits`] — `center ± k·sigma` from a single sequence
//! - [`xbar_r_limits`] — X-bar and Range limits from contiguous subgroups (n=2..10)
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

mod chart;
mod variables;

pub use chart::{simple_limits, ControlLimits};
pub use variables::{
    subgroup_factors, xbar_r_limits, SubgroupFactors, SubgroupLimits, MAX_SUBGROUP_SIZE,
    MIN_SUBGROUP_SIZE,
};
