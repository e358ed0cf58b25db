//! Declarative chart descriptions.
//!
//! Builders turn raw sequences and the statistics of [`crate::spc`] and
//! [`crate::detection`] into [`ChartDescription`] values shaped like Plotly
//! JSON figures. Rendering is left to the consumer.
//!
//! # Charts
//!
//! - [`xbar_chart`] — raw values with X-bar center, UCL, and LCL lines
//! - [`cusum_chart`] — CUSUM drift statistic with a zero line
//! - [`heatmap_chart`] — mean-aggregated grid over two categorical axes
//! - [`pareto_chart`] — descending counts with a cumulative-% secondary axis
//!
//! Every builder returns [`ChartDescription::empty`] for empty input.

mod control;
mod figure;
mod heatmap;
mod pareto;

pub use control::{cusum_chart, xbar_chart};
pub use figure::{
    Axis, Bar, ChartDescription, Dash, Heatmap, Layout, LineStyle, Marker, Scatter, Shape,
    ShapeLabel, Trace,
};
pub use heatmap::{heatmap_chart, pivot_mean, HeatmapAxes, HeatmapCell, Pivot};
pub use pareto::{pareto_chart, pareto_series, ParetoSeries};
