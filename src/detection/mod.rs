//! Drift and outlier detection.
//!
//! # Detectors
//!
//! - [`cusum`] — one-sided upper Cumulative Sum (Page, 1954) for slow upward drift
//! - [`detect_anomalies_zscore`] — population z-score outliers
//! - [`detect_anomalies_iqr`] — Tukey fences around the interquartile range
//!
//! # References
//!
//! - Page, E.S. (1954). "Continuous Inspection Schemes",
//!   *Biometrika* 41(1/2), pp. 100-115.
//! - Tukey, J.W. (1977). *Exploratory Data Analysis*. Addison-Wesley.

mod cusum;
mod outlier;

pub use cusum::{cusum, drift_points, CusumParams};
pub use outlier::{detect_anomalies_iqr, detect_anomalies_zscore, AnomalyMethod};
