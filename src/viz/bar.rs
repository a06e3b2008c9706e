//! Categorical bar comparisons over a caller-ordered set of bins.

use super::types::{Axes, Bar, Chart, Layer, LayerData, LayerStyle, XAxis};
use crate::error::{Error, Result};
use crate::models::{BinField, BinKey, TargetField, Table};
use crate::stats::aggregate_bins;
use crate::style::{BLACK, ColorRegistry, FOREST_GREEN, gradient_color};

/// Build a bar chart of `target` for exactly `bins`, in that order.
///
/// Person bars take their registry color; other bars are colored by position along a
/// continuous palette. Every bar carries a black standard-deviation error bar.
pub fn build_bar(
    table: &Table,
    bin: BinField,
    target: TargetField,
    bins: &[BinKey],
    registry: &mut ColorRegistry,
) -> Result<Chart> {
    if bins.is_empty() {
        return Err(Error::NoBins(bin.column_name()));
    }
    let rows = aggregate_bins(table, bin, target, bins)?;

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| Bar {
            label: row.key.to_string(),
            mean: row.mean,
            std_dev: row.std_dev,
            color: match &row.key {
                BinKey::Person(p) => registry.color_for(p),
                _ => gradient_color(i, rows.len()),
            },
        })
        .collect();

    let title = bar_title(bin, target);
    log::info!("built chart {title:?} with {} bars", bars.len());
    Ok(Chart {
        title,
        axes: Axes {
            x: XAxis::Categories(bars.iter().map(|b| b.label.clone()).collect()),
            x_label: bin.column_name(),
            y_label: match target {
                TargetField::NumberOfGuesses => "Average Guesses until Correct".to_string(),
                TargetField::Time => target.axis_label().to_string(),
            },
            y_format: target.into(),
            y_hint: None,
        },
        layers: vec![Layer {
            label: None,
            style: LayerStyle {
                color: FOREST_GREEN,
                error_color: BLACK,
                dashed: false,
                stroke_width: 1,
                cap_px: 5,
            },
            data: LayerData::Bars(bars),
        }],
        legend: false,
        target,
    })
}

fn bar_title(bin: BinField, target: TargetField) -> String {
    match (bin, target) {
        (BinField::Person, TargetField::NumberOfGuesses) => "Average guesses for everyone".into(),
        (BinField::Person, TargetField::Time) => "Average completion time for everyone".into(),
        (_, TargetField::NumberOfGuesses) => format!("Average guesses by {bin}"),
        (_, TargetField::Time) => format!("Average completion time by {bin}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::time::TimeOfDay;
    use chrono::NaiveDate;

    fn table() -> Table {
        let d = NaiveDate::from_ymd_opt(2022, 1, 13).unwrap();
        let t = TimeOfDay::from_hms(9, 0, 0).unwrap();
        Table::new(vec![
            Record::new("Cara", d, t, 4).with_letters(&[1, 3, 3, 5]),
            Record::new("Alice", d, t, 3).with_letters(&[2, 3, 5]),
            Record::new("Bob", d, t, 2).with_letters(&[3, 5]),
        ])
    }

    #[test]
    fn letter_bars_use_gradient_in_caller_order() {
        let mut reg = ColorRegistry::new();
        let bins = [BinKey::Category(5), BinKey::Category(3)];
        let chart = build_bar(
            &table(),
            BinField::CorrectLetters(2),
            TargetField::NumberOfGuesses,
            &bins,
            &mut reg,
        )
        .unwrap();
        assert_eq!(chart.title, "Average guesses by Correct Letters Guess 2");
        let LayerData::Bars(bars) = &chart.layers[0].data else {
            panic!("expected bars");
        };
        assert_eq!(bars[0].label, "5");
        assert_eq!(bars[0].mean, Some(2.0));
        assert_eq!(bars[0].std_dev, Some(0.0));
        assert_eq!(bars[0].color, gradient_color(0, 2));
        assert_eq!(bars[1].label, "3");
        assert_eq!(bars[1].mean, Some(3.5));
        assert_eq!(bars[1].color, gradient_color(1, 2));
        assert_eq!(reg.assigned_len(), 0);
    }

    #[test]
    fn empty_bin_list_is_rejected() {
        let mut reg = ColorRegistry::new();
        let err = build_bar(
            &table(),
            BinField::Person,
            TargetField::Time,
            &[],
            &mut reg,
        );
        assert!(matches!(err, Err(Error::NoBins(_))));
    }
}
