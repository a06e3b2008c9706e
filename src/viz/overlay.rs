//! Date-axis trend charts: population series, optionally behind one person's series.

use super::types::{Axes, Chart, Layer, LayerData, LayerStyle, XAxis, line_points};
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::models::{BinField, TargetField, Table};
use crate::stats::{AggregateMode, aggregate};
use crate::style::{BLACK, ColorRegistry, RED};

/// Error-bar cap width, in pixels, for line charts.
const LINE_CAP_PX: u32 = 10;
const EVERYONE: &str = "Everyone";

/// Build a trend chart of `target` over dates.
///
/// The population series (all persons) is always computed from `table` and is always the
/// first layer. A `background` chart must plot the same target over dates; only its axes
/// are reused, with its data range kept as a y-hint. Whenever a background or a `person`
/// is present the population series is drawn dashed and muted, and the person's own
/// series goes on top in the registry color with a legend entry. Absent dates stay as
/// gaps in every series.
///
/// This never collects the chart anywhere; the caller decides whether to keep it.
pub fn build_overlay(
    table: &Table,
    target: TargetField,
    person: Option<&str>,
    background: Option<&Chart>,
    registry: &mut ColorRegistry,
    config: &ReportConfig,
) -> Result<Chart> {
    let population = aggregate(
        table,
        BinField::Date,
        target,
        None,
        AggregateMode::KeepAbsent,
    )?;

    let axes = match background {
        Some(bg) => {
            if bg.target != target {
                return Err(Error::UnknownField(format!(
                    "background chart plots {}, cannot overlay {}",
                    bg.target, target
                )));
            }
            if !matches!(bg.axes.x, XAxis::Dates { .. }) {
                return Err(Error::UnknownField(format!(
                    "background chart {:?} has no date axis",
                    bg.title
                )));
            }
            Axes {
                y_hint: bg.data_range(),
                ..bg.axes.clone()
            }
        }
        None => date_axes(target, config),
    };

    let behind = background.is_some() || person.is_some();
    let solid = LayerStyle {
        color: BLACK,
        error_color: RED,
        dashed: false,
        stroke_width: 2,
        cap_px: LINE_CAP_PX,
    };
    let population_layer = Layer {
        label: behind.then(|| EVERYONE.to_string()),
        style: if behind { muted_style(solid) } else { solid },
        data: LayerData::Line(line_points(&population)),
    };

    let mut layers = vec![population_layer];

    let title = match person {
        Some(name) => {
            let rows = aggregate(
                table,
                BinField::Date,
                target,
                Some(name),
                AggregateMode::KeepAbsent,
            )?;
            let color = registry.color_for(name);
            layers.push(Layer {
                label: Some(name.to_string()),
                style: LayerStyle {
                    color,
                    error_color: color,
                    dashed: false,
                    stroke_width: 2,
                    cap_px: LINE_CAP_PX,
                },
                data: LayerData::Line(line_points(&rows)),
            });
            person_title(target, name)
        }
        None => population_title(target).to_string(),
    };

    log::info!("built chart {title:?}");
    Ok(Chart {
        title,
        axes,
        layers,
        legend: behind,
        target,
    })
}

fn muted_style(style: LayerStyle) -> LayerStyle {
    LayerStyle {
        color: style.color.muted(),
        error_color: style.error_color.muted(),
        dashed: true,
        stroke_width: 1,
        cap_px: style.cap_px,
    }
}

fn date_axes(target: TargetField, config: &ReportConfig) -> Axes {
    let (start, end) = config.date_window();
    Axes {
        x: XAxis::Dates { start, end },
        x_label: "Date".to_string(),
        y_label: target.axis_label().to_string(),
        y_format: target.into(),
        y_hint: None,
    }
}

fn population_title(target: TargetField) -> &'static str {
    match target {
        TargetField::Time => "Average Time for Wordle Completion",
        TargetField::NumberOfGuesses => "Average Number of Guesses for Wordle Completion",
    }
}

fn person_title(target: TargetField, name: &str) -> String {
    match target {
        TargetField::Time => format!("Time for Wordle Completion for : {name}"),
        TargetField::NumberOfGuesses => {
            format!("Number of Guesses for Wordle Completion for : {name}")
        }
    }
}
