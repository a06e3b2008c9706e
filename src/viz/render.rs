//! Draw a retained [`Chart`] onto any Plotters drawing area.

use super::text::truncate_to_width;
use super::types::{Bar, Chart, Layer, LayerData, LayerStyle, LinePoint, XAxis};
use super::util::{compute_left_label_area_px, format_value, rgb_color};
use crate::error::{Error, Result};
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::element::ErrorBar;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontFamily;

const MARGIN: u32 = 16;
const TICK_FONT_PX: u32 = 12;
const Y_LABELS: usize = 10;
const BAR_WIDTH: f64 = 0.8;

type Plot<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Draw `chart` into `area`: white background, caption, mesh, layers in order, legend.
///
/// The caller presents the root area once every page on it has been drawn.
pub fn draw_chart<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, chart: &Chart) -> Result<()> {
    area.fill(&WHITE).map_err(Error::render)?;

    let (ymin, ymax) = chart.y_range();
    let (xmin, xmax, x_count) = x_span(&chart.axes.x);
    let y_fmt = chart.axes.y_format;
    let left_px = compute_left_label_area_px(ymin, ymax, Y_LABELS, TICK_FONT_PX, y_fmt);

    let mut ctx = ChartBuilder::on(area)
        .margin(MARGIN)
        .caption(&chart.title, (FontFamily::SansSerif, 20))
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)
        .map_err(Error::render)?;

    let x_fmt = |x: &f64| x_tick_label(&chart.axes.x, *x);
    let y_label_fmt = |v: &f64| format_value(*v, y_fmt);
    ctx.configure_mesh()
        .x_desc(chart.axes.x_label.as_str())
        .y_desc(chart.axes.y_label.as_str())
        .x_labels(x_count)
        .y_labels(Y_LABELS)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_label_fmt)
        .disable_x_mesh()
        .label_style((FontFamily::SansSerif, TICK_FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(Error::render)?;

    for layer in &chart.layers {
        match &layer.data {
            LayerData::Line(points) => {
                let XAxis::Dates { start, end } = &chart.axes.x else {
                    return Err(Error::Render(format!(
                        "line layer on a categorical axis in {:?}",
                        chart.title
                    )));
                };
                draw_line(&mut ctx, points, &layer.style, *start, *end)?;
            }
            LayerData::Bars(bars) => draw_bars(&mut ctx, bars, &layer.style)?,
        }
        if chart.legend {
            register_legend(&mut ctx, layer)?;
        }
    }

    if chart.legend && chart.layers.iter().any(|l| l.label.is_some()) {
        ctx.configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(Error::render)?;
    }

    Ok(())
}

/// X range and tick count for an axis.
fn x_span(x: &XAxis) -> (f64, f64, usize) {
    match x {
        XAxis::Dates { start, end } => {
            let days = (*end - *start).num_days().max(1) as f64;
            (-0.5, days + 0.5, (days as usize + 1).min(12))
        }
        XAxis::Categories(labels) => {
            let n = labels.len().max(1);
            (-0.5, n as f64 - 0.5, n)
        }
    }
}

fn x_tick_label(x: &XAxis, v: f64) -> String {
    match x {
        XAxis::Dates { start, .. } => {
            let d = *start + Duration::days(v.round() as i64);
            d.format("%d/%m").to_string()
        }
        XAxis::Categories(labels) => {
            let idx = v.round();
            if (v - idx).abs() > 0.25 || idx < 0.0 {
                return String::new();
            }
            labels
                .get(idx as usize)
                .map(|s| truncate_to_width(s, TICK_FONT_PX, 120))
                .unwrap_or_default()
        }
    }
}

fn day_offset(start: NaiveDate, date: NaiveDate) -> f64 {
    (date - start).num_days() as f64
}

/// Connected runs of present points inside the window, in date order.
fn line_runs(points: &[LinePoint], start: NaiveDate, end: NaiveDate) -> Vec<Vec<&LinePoint>> {
    let mut sorted: Vec<&LinePoint> = points.iter().collect();
    sorted.sort_by_key(|p| p.date);

    let mut runs = Vec::new();
    let mut current: Vec<&LinePoint> = Vec::new();
    for p in sorted {
        let visible = p.date >= start && p.date <= end;
        match p.mean.filter(|m| m.is_finite()) {
            Some(_) if visible => current.push(p),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn draw_line<DB: DrawingBackend>(
    ctx: &mut Plot<'_, DB>,
    points: &[LinePoint],
    style: &LayerStyle,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<()> {
    let line = ShapeStyle {
        color: rgb_color(style.color).to_rgba(),
        filled: false,
        stroke_width: style.stroke_width,
    };
    let err = rgb_color(style.error_color).stroke_width(1);

    for run in line_runs(points, start, end) {
        let coords: Vec<(f64, f64)> = run
            .iter()
            .filter_map(|p| Some((day_offset(start, p.date), p.mean?)))
            .collect();
        if coords.len() > 1 {
            if style.dashed {
                ctx.draw_series(DashedLineSeries::new(coords.clone(), 6, 4, line))
                    .map_err(Error::render)?;
            } else {
                ctx.draw_series(LineSeries::new(coords.clone(), line))
                    .map_err(Error::render)?;
            }
        }
        ctx.draw_series(
            coords
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, line.filled())),
        )
        .map_err(Error::render)?;

        ctx.draw_series(run.iter().filter_map(|p| {
            let m = p.mean?;
            let s = p.std_dev.filter(|s| s.is_finite())?;
            Some(ErrorBar::new_vertical(
                day_offset(start, p.date),
                m - s,
                m,
                m + s,
                err,
                style.cap_px,
            ))
        }))
        .map_err(Error::render)?;
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    ctx: &mut Plot<'_, DB>,
    bars: &[Bar],
    style: &LayerStyle,
) -> Result<()> {
    let half = BAR_WIDTH / 2.0;
    ctx.draw_series(bars.iter().enumerate().filter_map(|(i, b)| {
        let m = b.mean.filter(|m| m.is_finite())?;
        let x = i as f64;
        Some(Rectangle::new(
            [(x - half, m.min(0.0)), (x + half, m.max(0.0))],
            rgb_color(b.color).filled(),
        ))
    }))
    .map_err(Error::render)?;

    let err = rgb_color(style.error_color).stroke_width(1);
    ctx.draw_series(bars.iter().enumerate().filter_map(|(i, b)| {
        let m = b.mean?;
        let s = b.std_dev.filter(|s| s.is_finite())?;
        Some(ErrorBar::new_vertical(
            i as f64,
            m - s,
            m,
            m + s,
            err,
            style.cap_px,
        ))
    }))
    .map_err(Error::render)?;
    Ok(())
}

/// Register a legend entry for `layer` via an empty series carrying its style.
fn register_legend<DB: DrawingBackend>(ctx: &mut Plot<'_, DB>, layer: &Layer) -> Result<()> {
    let Some(label) = &layer.label else {
        return Ok(());
    };
    let color = rgb_color(layer.style.color);
    let width = layer.style.stroke_width;
    ctx.draw_series(LineSeries::new(
        std::iter::empty::<(f64, f64)>(),
        color.stroke_width(width),
    ))
    .map_err(Error::render)?
    .label(label.as_str())
    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, day).unwrap()
    }

    fn pt(day: u32, mean: Option<f64>) -> LinePoint {
        LinePoint {
            date: d(day),
            mean,
            std_dev: mean.map(|_| 0.5),
        }
    }

    #[test]
    fn runs_split_at_gaps_and_window() {
        let pts = vec![
            pt(14, Some(2.0)),
            pt(13, Some(1.0)),
            pt(15, None),
            pt(16, Some(3.0)),
            pt(20, Some(4.0)),
        ];
        let runs = line_runs(&pts, d(13), d(18));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[0][0].date, d(13));
        assert_eq!(runs[1].len(), 1);
        assert_eq!(runs[1][0].date, d(16));
    }

    #[test]
    fn tick_labels() {
        let dates = XAxis::Dates {
            start: d(13),
            end: d(20),
        };
        assert_eq!(x_tick_label(&dates, 2.0), "15/01");
        let cats = XAxis::Categories(vec!["Alice".into(), "Bob".into()]);
        assert_eq!(x_tick_label(&cats, 1.0), "Bob");
        assert_eq!(x_tick_label(&cats, 0.5), "");
        assert_eq!(x_tick_label(&cats, 5.0), "");
    }
}
