//! Sensor readings and chronologically ordered series.

use serde::{Deserialize, Serialize};

/// One scalar measurement from a device.
///
/// Field names on the wire follow the ingestion payload
/// (`sensor_id`, `sensor_type`, `value`, optional `unit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Device identifier, e.g. `"TEMP-03"`.
    #[serde(rename = "sensor_id")]
    pub entity_id: String,
    /// Measurement category, e.g. `"temperature"`.
    #[serde(rename = "sensor_type")]
    pub category: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Reading {
    pub fn new(entity_id: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            category: category.into(),
            value,
            unit: None,
        }
    }
}

/// Readings in ascending chronological order.
///
/// Storage typically returns the newest reading first; build the series with
/// [`ReadingSeries::from_newest_first`] in that case so that every analysis
/// sees oldest-to-newest order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingSeries {
    readings: Vec<Reading>,
}

impl ReadingSeries {
    /// Wraps readings that are already oldest-first.
    pub fn from_chronological(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Reverses newest-first readings into chronological order.
    ///
    /// # Examples
    ///
    /// ```
    /// use factory_spc::reading::{Reading, ReadingSeries};
    ///
    /// let newest_first = vec![
    ///     Reading::new("PRES-01", "pressure", 103.0),
    ///     Reading::new("PRES-01", "pressure", 101.0),
    /// ];
    /// let series = ReadingSeries::from_newest_first(newest_first);
    /// assert_eq!(series.values(), vec![101.0, 103.0]);
    /// ```
    pub fn from_newest_first(mut readings: Vec<Reading>) -> Self {
        readings.reverse();
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// Reading values in series order.
    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.value).collect()
    }

    /// Entity identifiers in series order, used as chart labels.
    pub fn entity_ids(&self) -> Vec<String> {
        self.readings.iter().map(|r| r.entity_id.clone()).collect()
    }

    /// Categories in series order.
    pub fn categories(&self) -> Vec<String> {
        self.readings.iter().map(|r| r.category.clone()).collect()
    }
}

impl FromIterator<Reading> for ReadingSeries {
    /// Collects readings assumed to be oldest-first.
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::from_chronological(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ReadingSeries {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
