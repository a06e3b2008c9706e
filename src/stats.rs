//! Aggregation engine: group a [`Table`] by a bin field and summarize a target field.

use crate::error::{Error, Result};
use crate::models::{BinField, BinKey, Record, Table, TargetField};
use ahash::AHashMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mean and standard deviation of one bin.
///
/// `mean`/`std_dev` are `None` when no record landed in the bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: BinKey,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl AggregateRow {
    pub fn is_absent(&self) -> bool {
        self.mean.is_none()
    }
}

/// What to do with bins that received no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateMode {
    /// Keep them as gaps (overlays against a population series).
    #[default]
    KeepAbsent,
    /// Remove them (overview tables).
    DropAbsent,
}

/// Arithmetic mean and population standard deviation.
///
/// A single sample has a standard deviation of `0.0`; an empty slice yields `None`.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, var.max(0.0).sqrt()))
}

/// Group `table` by `bin` and summarize `target` in each bin.
///
/// With a `person` filter only that person's records contribute, but the bins are still
/// every value observed in the full table, in first-observed order.
pub fn aggregate(
    table: &Table,
    bin: BinField,
    target: TargetField,
    person: Option<&str>,
    mode: AggregateMode,
) -> Result<Vec<AggregateRow>> {
    let bin = bin.validate()?;
    let rows: Vec<&Record> = match person {
        Some(p) => table.for_person(p)?,
        None => table.rows().iter().collect(),
    };
    let mut out = summarize(&rows, bin, target, table.distinct_bins(bin));
    if mode == AggregateMode::DropAbsent {
        out.retain(|r| !r.is_absent());
    }
    log::debug!(
        "aggregated {} by {} ({} bins, person={:?})",
        target,
        bin,
        out.len(),
        person
    );
    Ok(out)
}

/// Like [`aggregate`] over the full table, but for exactly `bins`, in the given order.
///
/// Every requested bin must have been observed in the table for `bin`.
pub fn aggregate_bins(
    table: &Table,
    bin: BinField,
    target: TargetField,
    bins: &[BinKey],
) -> Result<Vec<AggregateRow>> {
    let bin = bin.validate()?;
    let observed = table.distinct_bins(bin);
    for key in bins {
        if !bin.accepts(key) {
            return Err(Error::UnknownField(format!(
                "{key:?} is not a value of {bin}"
            )));
        }
        if !observed.contains(key) {
            return Err(match key {
                BinKey::Person(p) => Error::UnknownPerson(p.clone()),
                other => Error::UnknownBin {
                    field: bin.column_name(),
                    value: other.to_string(),
                },
            });
        }
    }
    let rows: Vec<&Record> = table.rows().iter().collect();
    Ok(summarize(&rows, bin, target, bins.to_vec()))
}

fn summarize(
    rows: &[&Record],
    bin: BinField,
    target: TargetField,
    bins: Vec<BinKey>,
) -> Vec<AggregateRow> {
    let mut groups: AHashMap<BinKey, Vec<f64>> = AHashMap::new();
    for r in rows {
        if let Some(key) = bin.key_of(r) {
            groups.entry(key).or_default().push(target.value_of(r));
        }
    }
    bins.into_iter()
        .map(|key| {
            let values = groups.get(&key).map(Vec::as_slice).unwrap_or_default();
            let stats = mean_std(values);
            AggregateRow {
                count: values.len(),
                mean: stats.map(|(m, _)| m),
                std_dev: stats.map(|(_, s)| s),
                key,
            }
        })
        .collect()
}

/// Per-date overview of both target fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRow {
    pub date: NaiveDate,
    pub count: usize,
    /// Seconds since midnight.
    pub mean_time: f64,
    pub std_dev_time: f64,
    pub mean_guesses: f64,
    pub std_dev_guesses: f64,
}

/// Date-binned time and guess statistics, absent dates dropped.
pub fn error_table(table: &Table, person: Option<&str>) -> Result<Vec<ErrorRow>> {
    let times = aggregate(
        table,
        BinField::Date,
        TargetField::Time,
        person,
        AggregateMode::DropAbsent,
    )?;
    let guesses = aggregate(
        table,
        BinField::Date,
        TargetField::NumberOfGuesses,
        person,
        AggregateMode::DropAbsent,
    )?;
    let mut out = Vec::with_capacity(times.len());
    for (t, g) in times.into_iter().zip(guesses) {
        let (BinKey::Date(date), Some(mt), Some(st), Some(mg), Some(sg)) =
            (t.key, t.mean, t.std_dev, g.mean, g.std_dev)
        else {
            continue;
        };
        out.push(ErrorRow {
            date,
            count: t.count,
            mean_time: mt,
            std_dev_time: st,
            mean_guesses: mg,
            std_dev_guesses: sg,
        });
    }
    Ok(out)
}
