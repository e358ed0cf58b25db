//! Per-sensor digest for maintenance summaries.
//!
//! Groups a reading series by sensor, reports per-group aggregates, and
//! lists every z-score anomaly together with the group's control limits.
//! The digest is the numeric input of an external summary composer; wording
//! and recommendations are not produced here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::detection::detect_anomalies_zscore;
use crate::error::Result;
use crate::reading::ReadingSeries;
use crate::spc::simple_limits;
use crate::summary::finite_mean;

/// Aggregate for one sensor group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// `"{entity_id} ({category})"`.
    pub key: String,
    pub count: usize,
    pub mean: f64,
}

/// A reading flagged as anomalous within its sensor group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub sensor: String,
    pub value: f64,
    pub ucl: f64,
    pub lcl: f64,
}

/// Aggregates and anomaly findings over a reading series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorDigest {
    /// Total number of readings scanned.
    pub total: usize,
    /// One entry per sensor group, in first-seen order.
    pub groups: Vec<GroupSummary>,
    /// Findings in group order, then series order within a group.
    pub anomalies: Vec<AnomalyFinding>,
}

impl SensorDigest {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Group key for a reading.
fn sensor_key(entity_id: &str, category: &str) -> String {
    format!("{entity_id} ({category})")
}

/// Builds the digest of `series`.
///
/// Groups with fewer than `config.min_group_size` readings contribute a
/// summary but are not scanned for anomalies. Non-finite readings are
/// skipped.
///
/// # Examples
///
/// ```
/// use factory_spc::config::AnalysisConfig;
/// use factory_spc::digest::sensor_digest;
/// use factory_spc::reading::{Reading, ReadingSeries};
///
/// let mut readings: Vec<Reading> =
///     (0..20).map(|_| Reading::new("VIBR-01", "vibration", 5.0)).collect();
/// readings.push(Reading::new("VIBR-01", "vibration", 40.0));
/// let series = ReadingSeries::from_chronological(readings);
///
/// let digest = sensor_digest(&series, &AnalysisConfig::default()).unwrap();
/// assert_eq!(digest.total, 21);
/// assert_eq!(digest.groups[0].key, "VIBR-01 (vibration)");
/// assert_eq!(digest.anomalies.len(), 1);
/// assert_eq!(digest.anomalies[0].value, 40.0);
/// ```
pub fn sensor_digest(series: &ReadingSeries, config: &AnalysisConfig) -> Result<SensorDigest> {
    config.validate()?;

    let mut order: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for reading in series {
        if !reading.value.is_finite() {
            tracing::debug!(sensor = %reading.entity_id, "skipping non-finite reading");
            continue;
        }
        let key = sensor_key(&reading.entity_id, &reading.category);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            order.push((key, Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(reading.value);
    }

    let mut groups = Vec::with_capacity(order.len());
    let mut anomalies = Vec::new();
    for (key, values) in order {
        let Some(mean) = finite_mean(&values) else {
            continue;
        };
        if values.len() >= config.min_group_size {
            if let Some(limits) = simple_limits(&values, config.sigma_multiplier) {
                for i in detect_anomalies_zscore(&values, config.zscore_threshold) {
                    anomalies.push(AnomalyFinding {
                        sensor: key.clone(),
                        value: values[i],
                        ucl: limits.ucl,
                        lcl: limits.lcl,
                    });
                }
            }
        }
        groups.push(GroupSummary {
            key,
            count: values.len(),
            mean,
        });
    }

    Ok(SensorDigest {
        total: series.len(),
        groups,
        anomalies,
    })
}
