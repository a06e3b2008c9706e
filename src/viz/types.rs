//! Retained chart description handed from the builders to the renderer.
//!
//! A [`Chart`] owns no backend resources: it is plain data until a document sink draws
//! it, so building many charts holds nothing open.

use crate::models::TargetField;
use crate::stats::AggregateRow;
use crate::style::Rgb8;
use chrono::NaiveDate;

/// Vertical axis tick format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Seconds since midnight shown as `HH:MM`.
    Clock,
    Number,
}

impl From<TargetField> for ValueFormat {
    fn from(target: TargetField) -> Self {
        if target.is_duration() {
            ValueFormat::Clock
        } else {
            ValueFormat::Number
        }
    }
}

/// Horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Inclusive calendar window; points outside are not drawn.
    Dates { start: NaiveDate, end: NaiveDate },
    /// One slot per bar, in display order.
    Categories(Vec<String>),
}

/// Axis configuration shared by every layer of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub x: XAxis,
    pub x_label: String,
    pub y_label: String,
    pub y_format: ValueFormat,
    /// Y range the chart must cover even if its own layers do not reach it.
    pub y_hint: Option<(f64, f64)>,
}

/// One point of a line layer; `mean == None` is a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub color: Rgb8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    Line(Vec<LinePoint>),
    Bars(Vec<Bar>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub color: Rgb8,
    pub error_color: Rgb8,
    pub dashed: bool,
    pub stroke_width: u32,
    /// Error bar cap width in pixels.
    pub cap_px: u32,
}

/// A series drawn on the chart. Layers are drawn in order, so back layers come first.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Legend entry, if any.
    pub label: Option<String>,
    pub style: LayerStyle,
    pub data: LayerData,
}

impl Layer {
    /// Min/max of `mean ± std_dev` over present points.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let spans: Vec<(f64, f64)> = match &self.data {
            LayerData::Line(pts) => pts.iter().filter_map(|p| span(p.mean, p.std_dev)).collect(),
            LayerData::Bars(bars) => bars
                .iter()
                .filter_map(|b| span(b.mean, b.std_dev))
                // Bars grow from zero.
                .map(|(lo, hi)| (lo.min(0.0), hi.max(0.0)))
                .collect(),
        };
        spans
            .into_iter()
            .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
    }
}

fn span(mean: Option<f64>, std_dev: Option<f64>) -> Option<(f64, f64)> {
    let m = mean.filter(|m| m.is_finite())?;
    let s = std_dev.filter(|s| s.is_finite()).unwrap_or(0.0);
    Some((m - s, m + s))
}

/// A finished chart: title, axes and layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub axes: Axes,
    pub layers: Vec<Layer>,
    pub legend: bool,
    /// Target field plotted on the vertical axis.
    pub target: TargetField,
}

impl Chart {
    /// Y range covering every layer and the axes hint, padded by 5 % on each side.
    pub fn y_range(&self) -> (f64, f64) {
        let (mut lo, mut hi) = self.data_range().unwrap_or((0.0, 1.0));
        if (hi - lo).abs() < f64::EPSILON {
            lo -= 1.0;
            hi += 1.0;
        }
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }

    /// Unpadded data range; what a chart built on top of this one must keep visible.
    pub fn data_range(&self) -> Option<(f64, f64)> {
        self.layers
            .iter()
            .filter_map(Layer::value_bounds)
            .chain(self.axes.y_hint)
            .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
    }
}

/// Line points for aggregate rows keyed by date; rows with other key types are skipped.
pub fn line_points(rows: &[AggregateRow]) -> Vec<LinePoint> {
    rows.iter()
        .filter_map(|r| match r.key {
            crate::models::BinKey::Date(date) => Some(LinePoint {
                date,
                mean: r.mean,
                std_dev: r.std_dev,
            }),
            _ => None,
        })
        .collect()
}
