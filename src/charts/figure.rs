//! Declarative figure model.
//!
//! Mirrors the subset of the Plotly JSON figure schema the chart builders
//! emit: a list of traces plus a layout. Nothing here draws; the structures
//! are handed to an external plotting library as-is.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Page template applied to every non-empty chart.
pub(crate) const TEMPLATE: &str = "plotly_white";
/// Plot mode for line series with point markers.
pub(crate) const LINES_MARKERS: &str = "lines+markers";

/// A complete chart: traces plus layout.
///
/// The empty-chart sentinel ([`ChartDescription::empty`]) carries neither
/// and serializes to `{"data":[]}`; boundary layers detect it with
/// [`ChartDescription::is_empty`] and report "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescription {
    /// Data series.
    pub data: Vec<Trace>,
    /// Titles, axes, and reference lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl ChartDescription {
    /// The empty-chart sentinel.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            layout: None,
        }
    }

    /// Whether this is the empty-chart sentinel.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serializes to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Horizontal reference lines as `(y, label)` pairs, in layout order.
    pub fn reference_lines(&self) -> Vec<(f64, Option<&str>)> {
        self.layout
            .as_ref()
            .map(|layout| {
                layout
                    .shapes
                    .iter()
                    .map(|s| (s.y0, s.label.as_ref().map(|l| l.text.as_str())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Line and/or marker series.
    Scatter(Scatter),
    /// Vertical bars.
    Bar(Bar),
    /// Color-scaled matrix.
    Heatmap(Heatmap),
}

/// Line/marker series over categorical x positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scatter {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: String,
    pub name: String,
    pub line: LineStyle,
    /// Secondary axis reference (`"y2"`), primary axis when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

/// Bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub name: String,
    pub marker: Marker,
}

/// Matrix of cell values; `None` marks an empty cell and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub z: Vec<Vec<Option<f64>>>,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub colorscale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<Dash>,
}

impl LineStyle {
    pub(crate) fn solid(color: &str) -> Self {
        Self {
            color: color.to_string(),
            dash: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Dash,
    Dot,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

impl Layout {
    pub(crate) fn new(title: impl Into<String>, x_title: &str, y_title: &str) -> Self {
        Self {
            title: title.into(),
            xaxis: Axis::titled(x_title),
            yaxis: Axis::titled(y_title),
            yaxis2: None,
            shapes: Vec::new(),
            template: TEMPLATE.to_string(),
            showlegend: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    /// Axis this one is drawn over (`"y"` for a secondary y axis).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

impl Axis {
    pub(crate) fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            overlaying: None,
            side: None,
            range: None,
        }
    }
}

/// A full-width horizontal line at `y0 == y1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
    pub xref: String,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub line: LineStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ShapeLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeLabel {
    pub text: String,
}

impl Shape {
    pub(crate) fn hline(y: f64, color: &str, dash: Dash, label: Option<&str>) -> Self {
        Self {
            kind: "line".to_string(),
            xref: "paper".to_string(),
            x0: 0.0,
            x1: 1.0,
            y0: y,
            y1: y,
            line: LineStyle {
                color: color.to_string(),
                dash: Some(dash),
            },
            label: label.map(|text| ShapeLabel {
                text: text.to_string(),
            }),
        }
    }
}

/// Stringified positional indices `"0", "1", ...`.
pub(crate) fn positional_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}
