//! Per-call analysis parameters.
//!
//! Nothing here is persisted: an [`AnalysisConfig`] is built by the caller
//! (usually from request parameters or a JSON document) and passed into each
//! query. Missing fields take the standard SPC defaults.
//!
//! # Examples
//!
//! ```
//! use factory_spc::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json(r#"{ "subgroup_size": 4 }"#).unwrap();
//! assert_eq!(config.subgroup_size, 4);
//! assert!((config.zscore_threshold - 3.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};

/// Default sigma multiplier for Shewhart limits.
pub const DEFAULT_SIGMA_MULTIPLIER: f64 = 3.0;
/// Default X-bar/R subgroup size.
pub const DEFAULT_SUBGROUP_SIZE: usize = 5;
/// Default z-score threshold.
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;
/// Default Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
/// Default CUSUM allowance, in sigma units.
pub const DEFAULT_CUSUM_K: f64 = 0.5;
/// Smallest sensor group that the digest scans for anomalies.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 3;

/// Numeric parameters shared by the statistics, anomaly, chart, and digest
/// queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// k in `center ± k·sigma`.
    pub sigma_multiplier: f64,
    /// Requested X-bar/R subgroup size (2..=10).
    pub subgroup_size: usize,
    /// `|z|` above which a reading is anomalous.
    pub zscore_threshold: f64,
    /// Fence multiplier for the IQR method.
    pub iqr_multiplier: f64,
    /// CUSUM allowance k.
    pub cusum_k: f64,
    /// CUSUM target; the sample mean when unset.
    pub cusum_target: Option<f64>,
    /// Minimum readings per sensor before the digest looks for anomalies.
    pub min_group_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sigma_multiplier: DEFAULT_SIGMA_MULTIPLIER,
            subgroup_size: DEFAULT_SUBGROUP_SIZE,
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            cusum_k: DEFAULT_CUSUM_K,
            cusum_target: None,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
        }
    }
}

impl AnalysisConfig {
    /// Parses a JSON document and validates the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !(2..=10).contains(&self.subgroup_size) {
            return Err(SpcError::InvalidParameter {
                name: "subgroup_size",
                value: self.subgroup_size as f64,
            });
        }
        positive("sigma_multiplier", self.sigma_multiplier)?;
        positive("zscore_threshold", self.zscore_threshold)?;
        positive("iqr_multiplier", self.iqr_multiplier)?;
        non_negative("cusum_k", self.cusum_k)?;
        if let Some(target) = self.cusum_target {
            if !target.is_finite() {
                return Err(SpcError::InvalidParameter {
                    name: "cusum_target",
                    value: target,
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SpcError::InvalidParameter { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SpcError::InvalidParameter { name, value })
    }
}
