//! Point outlier detection: z-score and IQR (Tukey fences).
//!
//! Both detectors return ascending zero-based indices into the input. A
//! call uses exactly one method; results are never merged.
//!
//! # References
//!
//! - Tukey, J.W. (1977). *Exploratory Data Analysis*. Addison-Wesley.
//! - Hyndman, R.J. & Fan, Y. (1996). "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4), pp. 361-365.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use crate::config::{DEFAULT_IQR_MULTIPLIER, DEFAULT_ZSCORE_THRESHOLD};
use crate::error::SpcError;
use crate::summary::mean_and_population_std;

/// Minimum length for quartile-based detection.
const MIN_IQR_LEN: usize = 4;

/// Flags indices whose population z-score magnitude exceeds `threshold`.
///
/// # Returns
///
/// Empty if fewer than two values, zero standard deviation, or any
/// non-finite value, since no meaningful z-score exists in those cases.
///
/// Note that with population sigma no single point can reach
/// `|z| > sqrt(n - 1)`, so short sequences need a lower threshold.
///
/// # Examples
///
/// ```
/// use factory_spc::detection::detect_anomalies_zscore;
///
/// let mut data = vec![10.0; 20];
/// data[7] = 30.0;
/// assert_eq!(detect_anomalies_zscore(&data, 3.0), vec![7]);
/// ```
pub fn detect_anomalies_zscore(values: &[f64], threshold: f64) -> Vec<usize> {
    if values.len() < 2 {
        return Vec::new();
    }
    let Some((mean, std)) = mean_and_population_std(values) else {
        return Vec::new();
    };
    if std == 0.0 {
        return Vec::new();
    }
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| ((v - mean) / std).abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Flags indices outside `[Q1 - k·IQR, Q3 + k·IQR]`.
///
/// Quartiles use linear interpolation between order statistics (R-7).
///
/// # Returns
///
/// Empty if fewer than four values or any non-finite value.
///
/// # Examples
///
/// ```
/// use factory_spc::detection::detect_anomalies_iqr;
///
/// assert_eq!(detect_anomalies_iqr(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5), vec![5]);
/// assert!(detect_anomalies_iqr(&[1.0, 2.0, 100.0], 1.5).is_empty());
/// ```
pub fn detect_anomalies_iqr(values: &[f64], k: f64) -> Vec<usize> {
    if values.len() < MIN_IQR_LEN || values.iter().any(|v| !v.is_finite()) {
        return Vec::new();
    }
    let (Some(q1), Some(q3)) = (stats::quantile(values, 0.25), stats::quantile(values, 0.75))
    else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let lower = q1 - k * iqr;
    let upper = q3 + k * iqr;
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v < lower || v > upper)
        .map(|(i, _)| i)
        .collect()
}

/// Outlier detection method, selected by name at the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyMethod {
    /// Population z-score against a threshold.
    #[serde(rename = "zscore")]
    ZScore,
    /// Tukey fences around the interquartile range.
    #[serde(rename = "iqr")]
    Iqr,
}

impl AnomalyMethod {
    /// Name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZScore => "zscore",
            Self::Iqr => "iqr",
        }
    }

    /// Threshold (z) or fence multiplier (IQR) used when the caller gives none.
    pub fn default_threshold(self) -> f64 {
        match self {
            Self::ZScore => DEFAULT_ZSCORE_THRESHOLD,
            Self::Iqr => DEFAULT_IQR_MULTIPLIER,
        }
    }

    /// Runs this method alone over `values`.
    pub fn detect(self, values: &[f64], threshold: f64) -> Vec<usize> {
        match self {
            Self::ZScore => detect_anomalies_zscore(values, threshold),
            Self::Iqr => detect_anomalies_iqr(values, threshold),
        }
    }
}

impl FromStr for AnomalyMethod {
    type Err = SpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zscore" => Ok(Self::ZScore),
            "iqr" => Ok(Self::Iqr),
            other => Err(SpcError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for AnomalyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
