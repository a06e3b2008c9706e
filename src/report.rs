//! The full report: a fixed sequence of charts over one table.

use crate::collector::FigureCollector;
use crate::config::ReportConfig;
use crate::document::{DocumentSink, PagedDocument};
use crate::error::Result;
use crate::models::{BinField, BinKey, Table, TargetField};
use crate::storage::load_csv;
use crate::style::ColorRegistry;
use crate::viz::{build_bar, build_overlay};
use std::path::{Path, PathBuf};

/// Build every chart of a report, in page order.
///
/// 1. average guesses per person (alphabetical);
/// 2. per person, in first-observed order: time then guesses over the population;
/// 3. population time, population guesses;
/// 4. average guesses by correct letters after each configured guess.
pub fn build_report(table: &Table, config: &ReportConfig) -> Result<FigureCollector> {
    let mut registry = ColorRegistry::from_config(config);
    let mut collector = FigureCollector::new();

    let mut persons: Vec<BinKey> = table
        .distinct_persons()
        .iter()
        .map(|p| BinKey::Person(p.clone()))
        .collect();
    persons.sort();
    collector.collect(build_bar(
        table,
        BinField::Person,
        TargetField::NumberOfGuesses,
        &persons,
        &mut registry,
    )?);

    let targets = [TargetField::Time, TargetField::NumberOfGuesses];
    let mut populations = Vec::with_capacity(targets.len());
    for target in targets {
        populations.push(build_overlay(table, target, None, None, &mut registry, config)?);
    }

    for person in table.distinct_persons() {
        for background in &populations {
            collector.collect(build_overlay(
                table,
                background.target,
                Some(person.as_str()),
                Some(background),
                &mut registry,
                config,
            )?);
        }
    }

    for chart in populations {
        collector.collect(chart);
    }

    for &guess in &config.letter_guesses {
        let field = BinField::correct_letters(guess)?;
        let mut bins = table.distinct_bins(field);
        if bins.is_empty() {
            log::warn!("no values recorded for {field}; skipping its chart");
            continue;
        }
        bins.sort();
        collector.collect(build_bar(
            table,
            field,
            TargetField::NumberOfGuesses,
            &bins,
            &mut registry,
        )?);
    }

    log::info!(
        "report has {} charts for {} persons",
        collector.len(),
        table.distinct_persons().len()
    );
    Ok(collector)
}

/// Load `input`, build the report and write it to `output`.
///
/// Nothing is written unless every chart could be built.
pub fn run(
    input: &Path,
    output: &Path,
    config: &ReportConfig,
    split: bool,
) -> Result<Vec<PathBuf>> {
    let table = load_csv(input)?;
    let mut collector = build_report(&table, config)?;
    let mut sink = PagedDocument::from_config(config, split);
    sink.write_all(collector.drain(), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::time::TimeOfDay;
    use chrono::NaiveDate;

    #[test]
    fn chart_order_follows_report_layout() {
        let d = NaiveDate::from_ymd_opt(2022, 1, 13).unwrap();
        let t = TimeOfDay::from_hms(9, 0, 0).unwrap();
        let table = Table::new(vec![
            Record::new("Zoe", d, t, 3).with_letters(&[1, 2, 5]),
            Record::new("Adam", d, t, 2).with_letters(&[0, 5]),
        ]);
        let cfg = ReportConfig {
            today: Some(d),
            ..ReportConfig::default()
        };
        let titles: Vec<String> = build_report(&table, &cfg)
            .unwrap()
            .drain()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(
            titles,
            [
                "Average guesses for everyone",
                "Time for Wordle Completion for : Zoe",
                "Number of Guesses for Wordle Completion for : Zoe",
                "Time for Wordle Completion for : Adam",
                "Number of Guesses for Wordle Completion for : Adam",
                "Average Time for Wordle Completion",
                "Average Number of Guesses for Wordle Completion",
                "Average guesses by Correct Letters Guess 1",
                "Average guesses by Correct Letters Guess 2",
            ]
        );
    }
}
