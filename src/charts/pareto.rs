//! Pareto chart: categories by descending count with a cumulative-% overlay.

use std::cmp::Ordering;

use super::figure::{
    Axis, Bar, ChartDescription, Layout, LineStyle, Marker, Scatter, Trace, LINES_MARKERS,
};
use crate::error::{ensure_finite, ensure_same_len, Result, SpcError};

/// Upper bound of the secondary (percentage) axis.
const PERCENT_AXIS_MAX: f64 = 105.0;
const BAR_COLOR: &str = "#2563eb";
const CUMULATIVE_COLOR: &str = "#dc2626";

/// Categories sorted by descending count, with running percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct ParetoSeries {
    pub labels: Vec<String>,
    pub counts: Vec<f64>,
    /// Running share of the total, in percent; all zero when the total is 0.
    pub cumulative_percent: Vec<f64>,
}

/// Sorts categories by descending count and accumulates percentages.
///
/// Ties keep their input order. Counts near `f64::MAX` are rescaled by the
/// largest count so the running share stays finite.
///
/// # Errors
///
/// [`SpcError::LengthMismatch`] when labels and counts differ in length,
/// [`SpcError::NonFiniteValue`] for a NaN or infinite count, and
/// [`SpcError::InvalidParameter`] for a negative count.
///
/// # Examples
///
/// ```
/// use factory_spc::charts::pareto_series;
///
/// let labels = ["B".to_string(), "A".to_string()];
/// let series = pareto_series(&labels, &[1.0, 3.0]).unwrap();
/// assert_eq!(series.labels, vec!["A", "B"]);
/// assert_eq!(series.cumulative_percent, vec![75.0, 100.0]);
/// ```
pub fn pareto_series(labels: &[String], counts: &[f64]) -> Result<ParetoSeries> {
    ensure_same_len(labels.len(), counts.len())?;
    ensure_finite(counts)?;
    if let Some(&value) = counts.iter().find(|&&c| c < 0.0) {
        return Err(SpcError::InvalidParameter {
            name: "count",
            value,
        });
    }

    let mut pairs: Vec<(&String, f64)> = labels.iter().zip(counts.iter().copied()).collect();
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut scale = 1.0;
    let mut total: f64 = pairs.iter().map(|&(_, c)| c).sum();
    if !total.is_finite() {
        // Sorted descending, so the first count is the largest.
        scale = pairs.first().map_or(1.0, |&(_, c)| c);
        total = pairs.iter().map(|&(_, c)| c / scale).sum();
    }
    let mut running = 0.0;
    let cumulative_percent = pairs
        .iter()
        .map(|&(_, c)| {
            running += c / scale;
            if total > 0.0 {
                (running / total * 100.0).min(100.0)
            } else {
                0.0
            }
        })
        .collect();

    Ok(ParetoSeries {
        labels: pairs.iter().map(|&(l, _)| l.clone()).collect(),
        counts: pairs.iter().map(|&(_, c)| c).collect(),
        cumulative_percent,
    })
}

/// Builds a Pareto chart: count bars plus a cumulative-percentage line on a
/// secondary axis spanning 0–105%.
///
/// # Errors
///
/// [`SpcError::LengthMismatch`](crate::SpcError::LengthMismatch) when labels
/// and counts differ in length,
/// [`SpcError::NonFiniteValue`](crate::SpcError::NonFiniteValue) for a NaN or
/// infinite count, [`SpcError::InvalidParameter`](crate::SpcError::InvalidParameter)
/// for a negative count. Empty input gives the empty sentinel.
pub fn pareto_chart(labels: &[String], counts: &[f64], title: &str) -> Result<ChartDescription> {
    if labels.is_empty() && counts.is_empty() {
        tracing::debug!("pareto chart requested for empty input");
        return Ok(ChartDescription::empty());
    }
    let series = pareto_series(labels, counts)?;

    let mut layout = Layout::new(title, "Category", "Count");
    layout.yaxis2 = Some(Axis {
        title: "Cumulative %".to_string(),
        overlaying: Some("y".to_string()),
        side: Some("right".to_string()),
        range: Some([0.0, PERCENT_AXIS_MAX]),
    });
    layout.showlegend = Some(true);

    Ok(ChartDescription {
        data: vec![
            Trace::Bar(Bar {
                x: series.labels.clone(),
                y: series.counts,
                name: "Count".to_string(),
                marker: Marker {
                    color: BAR_COLOR.to_string(),
                },
            }),
            Trace::Scatter(Scatter {
                x: series.labels,
                y: series.cumulative_percent,
                mode: LINES_MARKERS.to_string(),
                name: "Cumulative %".to_string(),
                line: LineStyle::solid(CUMULATIVE_COLOR),
                yaxis: Some("y2".to_string()),
            }),
        ],
        layout: Some(layout),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pareto_two_categories() {
        let series = pareto_series(&labels(&["A", "B"]), &[3.0, 1.0]).expect("valid counts");
        assert_eq!(series.labels, vec!["A", "B"]);
        assert_eq!(series.counts, vec![3.0, 1.0]);
        assert_eq!(series.cumulative_percent, vec![75.0, 100.0]);
    }

    #[test]
    fn test_pareto_sorts_descending_stable() {
        let series = pareto_series(&labels(&["x", "y", "z", "w"]), &[2.0, 5.0, 2.0, 1.0])
            .expect("valid counts");
        assert_eq!(series.labels, vec!["y", "x", "z", "w"]);
        assert!((series.cumulative_percent[0] - 50.0).abs() < 1e-12);
        assert!((series.cumulative_percent[3] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_pareto_zero_total() {
        let series = pareto_series(&labels(&["a", "b"]), &[0.0, 0.0]).expect("valid counts");
        assert_eq!(series.cumulative_percent, vec![0.0, 0.0]);
    }

    #[test]
    fn test_pareto_chart_dual_axis() {
        let chart = pareto_chart(&labels(&["A", "B"]), &[3.0, 1.0], "Pareto Chart")
            .expect("valid input");
        assert_eq!(chart.data.len(), 2);
        let Trace::Bar(bars) = &chart.data[0] else {
            panic!("expected bar trace");
        };
        assert_eq!(bars.x, vec!["A", "B"]);
        let Trace::Scatter(line) = &chart.data[1] else {
            panic!("expected scatter trace");
        };
        assert_eq!(line.y, vec![75.0, 100.0]);
        assert_eq!(line.yaxis.as_deref(), Some("y2"));

        let layout = chart.layout.as_ref().expect("layout");
        assert_eq!(layout.title, "Pareto Chart");
        let y2 = layout.yaxis2.as_ref().expect("secondary axis");
        assert_eq!(y2.range, Some([0.0, 105.0]));
        assert_eq!(y2.overlaying.as_deref(), Some("y"));
        assert_eq!(y2.side.as_deref(), Some("right"));
        assert_eq!(layout.showlegend, Some(true));
    }

    #[test]
    fn test_pareto_chart_empty_and_invalid() {
        assert!(pareto_chart(&[], &[], "t").expect("empty ok").is_empty());
        let err = pareto_chart(&labels(&["A"]), &[1.0, 2.0], "t").unwrap_err();
        assert!(matches!(err, SpcError::LengthMismatch { labels: 1, values: 2 }));
        let err = pareto_chart(&labels(&["A"]), &[f64::NAN], "t").unwrap_err();
        assert!(matches!(err, SpcError::NonFiniteValue { index: 0 }));
    }

    #[test]
    fn test_pareto_rejects_negative_count() {
        let err = pareto_series(&labels(&["A", "B"]), &[5.0, -1.0]).unwrap_err();
        assert!(matches!(err, SpcError::InvalidParameter { name: "count", .. }));
        assert!(pareto_chart(&labels(&["A", "B"]), &[5.0, -1.0], "t").is_err());
    }

    #[test]
    fn test_pareto_huge_counts_stay_finite() {
        let series = pareto_series(&labels(&["A", "B"]), &[1e308, 1e308]).expect("valid counts");
        assert_eq!(series.cumulative_percent, vec![50.0, 100.0]);

        let series =
            pareto_series(&labels(&["A", "B", "C"]), &[1e308, 1e308, 1.0]).expect("valid counts");
        assert!(series.cumulative_percent.iter().all(|p| p.is_finite()));
        assert!((series.cumulative_percent[0] - 50.0).abs() < 1e-9);
        assert_eq!(series.cumulative_percent[2], 100.0);
    }
}
