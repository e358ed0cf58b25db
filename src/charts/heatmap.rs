//! Mean-aggregated heatmap over two categorical axes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::figure::{ChartDescription, Heatmap, Layout, Trace};
use crate::error::{Result, SpcError};
use crate::summary::finite_mean;

const COLORSCALE: &str = "Viridis";

/// One observation to pivot: `value` lands in cell (`row`, `column`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub row: String,
    pub column: String,
    pub value: f64,
}

/// Names of the pivoted dimensions, used for the title and axis labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapAxes {
    /// Column dimension.
    pub x: String,
    /// Row dimension.
    pub y: String,
    /// Aggregated value.
    pub z: String,
}

impl Default for HeatmapAxes {
    fn default() -> Self {
        Self {
            x: "sensor_id".to_string(),
            y: "sensor_type".to_string(),
            z: "value".to_string(),
        }
    }
}

/// Mean-aggregated pivot of `cells`.
///
/// Rows and columns are sorted; a cell with no observations is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub z: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    /// Number of grid cells (rows × columns), filled or not.
    pub fn size(&self) -> usize {
        self.rows.len() * self.columns.len()
    }
}

/// Pivots cells into a mean-aggregated grid.
///
/// # Errors
///
/// [`SpcError::NonFiniteValue`] if a cell value is NaN or infinite.
pub fn pivot_mean(cells: &[HeatmapCell]) -> Result<Pivot> {
    let mut groups: BTreeMap<&str, BTreeMap<&str, Vec<f64>>> = BTreeMap::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for (index, cell) in cells.iter().enumerate() {
        if !cell.value.is_finite() {
            return Err(SpcError::NonFiniteValue { index });
        }
        groups
            .entry(cell.row.as_str())
            .or_default()
            .entry(cell.column.as_str())
            .or_default()
            .push(cell.value);
        columns.insert(cell.column.as_str());
    }

    let z: Vec<Vec<Option<f64>>> = groups
        .values()
        .map(|row| {
            columns
                .iter()
                .map(|col| row.get(col).and_then(|vals| finite_mean(vals)))
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(Pivot {
        rows: groups.keys().map(|r| r.to_string()).collect(),
        columns: columns.into_iter().map(str::to_string).collect(),
        z,
    })
}

/// Builds a heatmap of per-cell means.
///
/// Returns the empty sentinel when `cells` is empty or the pivot has fewer
/// than two grid cells.
///
/// # Examples
///
/// ```
/// use factory_spc::charts::{heatmap_chart, HeatmapAxes, HeatmapCell};
///
/// let cell = |row: &str, column: &str, value: f64| HeatmapCell {
///     row: row.into(),
///     column: column.into(),
///     value,
/// };
/// let cells = [cell("pressure", "PRES-01", 100.0), cell("pressure", "PRES-02", 90.0)];
/// let chart = heatmap_chart(&cells, &HeatmapAxes::default()).unwrap();
/// assert!(!chart.is_empty());
/// assert!(heatmap_chart(&cells[..1], &HeatmapAxes::default()).unwrap().is_empty());
/// ```
pub fn heatmap_chart(cells: &[HeatmapCell], axes: &HeatmapAxes) -> Result<ChartDescription> {
    if cells.is_empty() {
        tracing::debug!("heatmap requested for empty input");
        return Ok(ChartDescription::empty());
    }
    let pivot = pivot_mean(cells)?;
    if pivot.size() < 2 {
        tracing::debug!(size = pivot.size(), "heatmap pivot too small to render");
        return Ok(ChartDescription::empty());
    }

    let layout = Layout::new(
        format!("Heatmap: {} by {} x {}", axes.z, axes.x, axes.y),
        &axes.x,
        &axes.y,
    );
    Ok(ChartDescription {
        data: vec![Trace::Heatmap(Heatmap {
            z: pivot.z,
            x: pivot.columns,
            y: pivot.rows,
            colorscale: COLORSCALE.to_string(),
        })],
        layout: Some(layout),
    })
}
