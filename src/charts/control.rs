//! X-bar and CUSUM control charts.

use super::figure::{
    positional_labels, ChartDescription, Dash, Layout, LineStyle, Scatter, Shape, Trace,
    LINES_MARKERS,
};
use crate::detection::{cusum, CusumParams};
use crate::error::{ensure_finite, ensure_same_len, Result};
use crate::spc::xbar_r_limits;

const VALUE_COLOR: &str = "#2563eb";
const CUSUM_COLOR: &str = "#7c3aed";

/// Resolves the x labels, defaulting to positional indices.
fn resolve_labels(labels: Option<&[String]>, n: usize) -> Result<Vec<String>> {
    match labels {
        Some(labels) => {
            ensure_same_len(labels.len(), n)?;
            Ok(labels.to_vec())
        }
        None => Ok(positional_labels(n)),
    }
}

/// Builds an X-bar control chart.
///
/// The raw values are drawn against `labels` with center, UCL, and LCL
/// reference lines taken from [`xbar_r_limits`] at `subgroup_size`. When the
/// limits overflow `f64` (ranges near `f64::MAX`) the values are drawn alone.
///
/// # Errors
///
/// [`SpcError::LengthMismatch`](crate::SpcError::LengthMismatch) if labels are
/// given with a different length, [`SpcError::NonFiniteValue`](crate::SpcError::NonFiniteValue)
/// for NaN or infinite values. Empty `values` give the empty sentinel.
///
/// # Examples
///
/// ```
/// use factory_spc::charts::xbar_chart;
///
/// let values: Vec<f64> = (0..20).map(f64::from).collect();
/// let chart = xbar_chart(&values, None, 5).unwrap();
/// assert_eq!(chart.reference_lines().len(), 3);
/// assert!(xbar_chart(&[], None, 5).unwrap().is_empty());
/// ```
pub fn xbar_chart(
    values: &[f64],
    labels: Option<&[String]>,
    subgroup_size: usize,
) -> Result<ChartDescription> {
    if values.is_empty() {
        tracing::debug!("x-bar chart requested for empty sequence");
        return Ok(ChartDescription::empty());
    }
    let x = resolve_labels(labels, values.len())?;
    ensure_finite(values)?;

    let mut layout = Layout::new("X-bar Control Chart", "Sample", "Value");
    match xbar_r_limits(values, subgroup_size) {
        Some(limits) => {
            layout.shapes = vec![
                Shape::hline(limits.xbar.center, "green", Dash::Dash, Some("CL")),
                Shape::hline(limits.xbar.ucl, "red", Dash::Dot, Some("UCL")),
                Shape::hline(limits.xbar.lcl, "red", Dash::Dot, Some("LCL")),
            ];
        }
        None => {
            tracing::warn!(
                n = values.len(),
                subgroup_size,
                "x-bar limits overflow, drawing values without reference lines"
            );
        }
    }

    Ok(ChartDescription {
        data: vec![Trace::Scatter(Scatter {
            x,
            y: values.to_vec(),
            mode: LINES_MARKERS.to_string(),
            name: "Values".to_string(),
            line: LineStyle::solid(VALUE_COLOR),
            yaxis: None,
        })],
        layout: Some(layout),
    })
}

/// Builds a CUSUM chart: the [`cusum`] statistic against `labels` with a
/// zero reference line.
///
/// # Errors
///
/// Same conditions as [`xbar_chart`].
pub fn cusum_chart(
    values: &[f64],
    labels: Option<&[String]>,
    params: &CusumParams,
) -> Result<ChartDescription> {
    if values.is_empty() {
        tracing::debug!("cusum chart requested for empty sequence");
        return Ok(ChartDescription::empty());
    }
    let x = resolve_labels(labels, values.len())?;
    ensure_finite(values)?;

    let mut layout = Layout::new("CUSUM Chart", "Sample", "CUSUM");
    layout.shapes = vec![Shape::hline(0.0, "gray", Dash::Dash, None)];

    Ok(ChartDescription {
        data: vec![Trace::Scatter(Scatter {
            x,
            y: cusum(values, params),
            mode: LINES_MARKERS.to_string(),
            name: "CUSUM".to_string(),
            line: LineStyle::solid(CUSUM_COLOR),
            yaxis: None,
        })],
        layout: Some(layout),
    })
}
