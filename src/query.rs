//! Query facade for boundary layers (HTTP handlers, batch jobs).
//!
//! Each query validates its parameters, runs the numeric core, and returns a
//! plain serializable result. Empty input is a defined response, never an
//! error.
//!
//! # Examples
//!
//! ```
//! use factory_spc::config::AnalysisConfig;
//! use factory_spc::query::{detect_anomalies, spc_statistics, AnomalyQuery};
//!
//! let config = AnalysisConfig::default();
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
//!
//! let stats = spc_statistics(&values, &config).unwrap();
//! assert_eq!(stats.count, 6);
//!
//! let report = detect_anomalies(&values, &AnomalyQuery::named("iqr"), &config).unwrap();
//! assert_eq!(report.indices, vec![5]);
//!
//! assert!(detect_anomalies(&values, &AnomalyQuery::named("median"), &config).is_err());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::charts::{
    cusum_chart, heatmap_chart, pareto_chart, xbar_chart, ChartDescription, HeatmapAxes,
    HeatmapCell,
};
use crate::config::{positive, AnalysisConfig};
use crate::detection::{detect_anomalies_zscore, AnomalyMethod, CusumParams};
use crate::error::{ensure_finite, Result};
use crate::reading::ReadingSeries;
use crate::spc::{simple_limits, ControlLimits};
use crate::summary::{mean_and_population_std, min_max};

/// Title of the reading-count Pareto chart.
pub const PARETO_TITLE: &str = "Readings by Sensor Type (Pareto)";

/// Summary statistics with 3-sigma limits and z-score anomalies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpcStatistics {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation; 0 for a single reading.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub control_limits: ControlLimits,
    pub anomaly_indices: Vec<usize>,
}

impl SpcStatistics {
    /// The defined response for an empty sequence: all zeros, no anomalies.
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
            control_limits: ControlLimits::zeroed(),
            anomaly_indices: Vec::new(),
        }
    }
}

/// Computes the statistics query over `values` (oldest first).
///
/// # Errors
///
/// [`SpcError::NonFiniteValue`](crate::SpcError::NonFiniteValue) for a NaN or
/// infinite reading, [`SpcError::InvalidParameter`](crate::SpcError::InvalidParameter)
/// for an invalid `config`.
pub fn spc_statistics(values: &[f64], config: &AnalysisConfig) -> Result<SpcStatistics> {
    config.validate()?;
    ensure_finite(values)?;
    let Some((min, max)) = min_max(values) else {
        return Ok(SpcStatistics::empty());
    };
    let (mean, std) = mean_and_population_std(values).unwrap_or_else(|| {
        tracing::warn!(n = values.len(), "moments overflow, reporting zero mean and std");
        (0.0, 0.0)
    });
    let control_limits = simple_limits(values, config.sigma_multiplier).unwrap_or_else(|| {
        tracing::warn!(
            n = values.len(),
            k = config.sigma_multiplier,
            "control limits overflow, reporting zeroed limits"
        );
        ControlLimits::zeroed()
    });

    Ok(SpcStatistics {
        count: values.len(),
        mean,
        std: if values.len() > 1 { std } else { 0.0 },
        min,
        max,
        control_limits,
        anomaly_indices: detect_anomalies_zscore(values, config.zscore_threshold),
    })
}

/// Anomaly query parameters as received from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyQuery {
    /// `"zscore"` or `"iqr"`; anything else is rejected.
    #[serde(default = "default_method_name")]
    pub method: String,
    /// z threshold or IQR fence multiplier; the configured default when unset.
    #[serde(default)]
    pub threshold: Option<f64>,
}

fn default_method_name() -> String {
    AnomalyMethod::ZScore.as_str().to_string()
}

impl Default for AnomalyQuery {
    fn default() -> Self {
        Self {
            method: default_method_name(),
            threshold: None,
        }
    }
}

impl AnomalyQuery {
    /// Query for `method` with the configured default threshold.
    pub fn named(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            threshold: None,
        }
    }

    /// Sets an explicit threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// Result of an anomaly query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub indices: Vec<usize>,
    pub method: AnomalyMethod,
    pub count: usize,
}

/// Runs exactly one detection method over `values`.
///
/// # Errors
///
/// [`SpcError::UnknownMethod`](crate::SpcError::UnknownMethod) for a method
/// name outside `{"zscore", "iqr"}`; invalid thresholds, invalid config, and
/// non-finite readings are rejected as well.
pub fn detect_anomalies(
    values: &[f64],
    query: &AnomalyQuery,
    config: &AnalysisConfig,
) -> Result<AnomalyReport> {
    let method: AnomalyMethod = query.method.parse()?;
    config.validate()?;
    let threshold = match query.threshold {
        Some(t) => positive("threshold", t)?,
        None => match method {
            AnomalyMethod::ZScore => config.zscore_threshold,
            AnomalyMethod::Iqr => config.iqr_multiplier,
        },
    };
    ensure_finite(values)?;

    let indices = method.detect(values, threshold);
    tracing::debug!(%method, threshold, n = values.len(), found = indices.len(), "anomaly query");
    Ok(AnomalyReport {
        count: indices.len(),
        indices,
        method,
    })
}

/// X-bar chart of a reading series, labelled by entity id.
pub fn xbar_chart_from_readings(
    series: &ReadingSeries,
    config: &AnalysisConfig,
) -> Result<ChartDescription> {
    config.validate()?;
    let labels = series.entity_ids();
    xbar_chart(&series.values(), Some(&labels), config.subgroup_size)
}

/// CUSUM chart of a reading series, labelled by entity id.
pub fn cusum_chart_from_readings(
    series: &ReadingSeries,
    config: &AnalysisConfig,
) -> Result<ChartDescription> {
    let params = CusumParams::new(config.cusum_target, config.cusum_k)?;
    let labels = series.entity_ids();
    cusum_chart(&series.values(), Some(&labels), &params)
}

/// Heatmap of mean reading per category (rows) and entity (columns).
pub fn heatmap_from_readings(series: &ReadingSeries) -> Result<ChartDescription> {
    let cells: Vec<HeatmapCell> = series
        .iter()
        .map(|r| HeatmapCell {
            row: r.category.clone(),
            column: r.entity_id.clone(),
            value: r.value,
        })
        .collect();
    heatmap_chart(&cells, &HeatmapAxes::default())
}

/// Number of readings per category, sorted by category name.
pub fn category_counts(series: &ReadingSeries) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for reading in series {
        *counts.entry(reading.category.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(category, n)| (category.to_string(), n))
        .collect()
}

/// Pareto chart of reading counts per category.
pub fn pareto_from_readings(series: &ReadingSeries) -> Result<ChartDescription> {
    let (labels, counts): (Vec<String>, Vec<f64>) = category_counts(series)
        .into_iter()
        .map(|(category, n)| (category, n as f64))
        .unzip();
    pareto_chart(&labels, &counts, PARETO_TITLE)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::charts::Trace;
    use crate::reading::Reading;
    use proptest::prelude::*;

    fn readings() -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(
            prop_oneof![
                6 => -1e6_f64..1e6,
                1 => 1e307_f64..f64::MAX,
                1 => Just(-f64::MAX),
            ],
            0..=60,
        )
    }

    proptest! {
        #[test]
        fn statistics_are_finite(values in readings()) {
            let stats = spc_statistics(&values, &AnalysisConfig::default()).expect("finite input");
            prop_assert_eq!(stats.count, values.len());
            let limits = stats.control_limits;
            let reported = [
                stats.mean,
                stats.std,
                stats.min,
                stats.max,
                limits.center,
                limits.ucl,
                limits.lcl,
                limits.sigma,
            ];
            prop_assert!(reported.iter().all(|v| v.is_finite()));
            prop_assert!(stats.std >= 0.0);
            prop_assert!(stats.anomaly_indices.iter().all(|&i| i < values.len()));
        }

        #[test]
        fn reading_charts_are_finite(values in readings()) {
            let series: ReadingSeries = values
                .iter()
                .enumerate()
                .map(|(i, &v)| Reading::new(format!("S-{}", i % 3), "temperature", v))
                .collect();
            let config = AnalysisConfig::default();
            let charts = [
                xbar_chart_from_readings(&series, &config).expect("finite input"),
                cusum_chart_from_readings(&series, &config).expect("finite input"),
                heatmap_from_readings(&series).expect("finite input"),
                pareto_from_readings(&series).expect("finite input"),
            ];
            for chart in &charts {
                prop_assert!(chart.reference_lines().iter().all(|(y, _)| y.is_finite()));
                for trace in &chart.data {
                    match trace {
                        Trace::Scatter(s) => prop_assert!(s.y.iter().all(|v| v.is_finite())),
                        Trace::Bar(b) => prop_assert!(b.y.iter().all(|v| v.is_finite())),
                        Trace::Heatmap(h) => {
                            prop_assert!(h.z.iter().flatten().flatten().all(|v| v.is_finite()))
                        }
                    }
                }
            }
        }
    }
}
