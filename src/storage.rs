//! Reading the puzzle log and persisting the per-date overview table.

use crate::error::{Error, Result};
use crate::models::{BinField, MAX_GUESSES, Record, Table, TargetField};
use crate::stats::ErrorRow;
use crate::time::{format_clock, format_duration, parse_date, parse_time_of_day};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const PERSON: &str = "Person";
const DATE: &str = "Date";
const MAX_LETTERS: u8 = 5;

/// Required header names, in canonical order.
pub fn required_columns() -> Vec<String> {
    let mut cols = vec![
        PERSON.to_string(),
        DATE.to_string(),
        TargetField::Time.column_name().to_string(),
        TargetField::NumberOfGuesses.column_name().to_string(),
    ];
    cols.extend((1..=MAX_GUESSES).map(|n| BinField::CorrectLetters(n).column_name()));
    cols
}

/// Load and validate a CSV puzzle log from disk.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let table = read_csv(File::open(path)?)?;
    log::info!(
        "loaded {} rows ({} persons, {} dates) from {}",
        table.len(),
        table.distinct_persons().len(),
        table.distinct_dates().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a CSV puzzle log with a header row. Extra columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let found: Vec<String> = headers.iter().map(str::to_string).collect();
    let required = required_columns();
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !found.iter().any(|f| f == *c))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(Error::Schema { missing, found });
    }
    // All present, so every lookup below succeeds.
    let idx: Vec<usize> = required
        .iter()
        .filter_map(|c| found.iter().position(|f| f == c))
        .collect();

    let mut rows = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let n = i + 1;
        rows.push(parse_row(&rec, &idx).map_err(|e| e.at_row(n))?);
    }
    if rows.is_empty() {
        return Err(Error::EmptyTable);
    }
    Ok(Table::new(rows))
}

fn parse_row(rec: &StringRecord, idx: &[usize]) -> Result<Record> {
    let cell = |k: usize| rec.get(idx[k]).unwrap_or("");

    let person = cell(0);
    if person.is_empty() {
        return Err(Error::format(0, PERSON, person, "a non-empty name"));
    }
    let date = parse_date(cell(1))?;
    let time = parse_time_of_day(cell(2))?;

    let raw = cell(3);
    let guesses = raw
        .parse::<u8>()
        .ok()
        .filter(|g| (1..=MAX_GUESSES).contains(g))
        .ok_or_else(|| {
            Error::format(
                0,
                TargetField::NumberOfGuesses.column_name(),
                raw,
                "an integer 1-6",
            )
        })?;

    let mut record = Record::new(person, date, time, guesses);
    for g in 1..=MAX_GUESSES {
        let raw = cell(3 + usize::from(g));
        if raw.is_empty() {
            continue;
        }
        let n = raw
            .parse::<u8>()
            .ok()
            .filter(|n| *n <= MAX_LETTERS)
            .ok_or_else(|| {
                Error::format(
                    0,
                    BinField::CorrectLetters(g).column_name(),
                    raw,
                    "an integer 0-5 or empty",
                )
            })?;
        record.correct_letters[usize::from(g - 1)] = Some(n);
    }
    Ok(record)
}

/// Save the overview table as CSV with header; times as `HH:MM`, spreads as `H:MM:SS`.
pub fn save_error_table_csv<P: AsRef<Path>>(rows: &[ErrorRow], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    write_error_table(rows, &mut wtr)?;
    wtr.flush()?;
    Ok(())
}

fn write_error_table<W: Write>(rows: &[ErrorRow], wtr: &mut csv::Writer<W>) -> Result<()> {
    wtr.write_record([
        "date",
        "count",
        "mean_time",
        "std_dev_time",
        "mean_guesses",
        "std_dev_guesses",
    ])?;
    for r in rows {
        wtr.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.count.to_string(),
            format_clock(r.mean_time),
            format_duration(r.std_dev_time),
            format!("{:.2}", r.mean_guesses),
            format!("{:.2}", r.std_dev_guesses),
        ])?;
    }
    Ok(())
}

/// Save the overview table as a pretty JSON array (raw seconds for time fields).
pub fn save_error_table_json<P: AsRef<Path>>(rows: &[ErrorRow], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::error_table;
    use tempfile::tempdir;

    const HEADER: &str = "Person,Date,Time,Number of Guesses,Correct Letters Guess 1,\
        Correct Letters Guess 2,Correct Letters Guess 3,Correct Letters Guess 4,\
        Correct Letters Guess 5,Correct Letters Guess 6";

    #[test]
    fn reads_rows_and_blank_letters() {
        let data = format!("{HEADER},Notes\nAlice,13/01/2022,08:15:00,3,1,3,5,,,,hi\n");
        let t = read_csv(data.as_bytes()).unwrap();
        let r = &t.rows()[0];
        assert_eq!(r.person, "Alice");
        assert_eq!(r.guesses, 3);
        assert_eq!(r.letters_after(2), Some(3));
        assert_eq!(r.letters_after(4), None);
    }

    #[test]
    fn bad_cells_report_their_row() {
        let data = format!(
            "{HEADER}\nAlice,13/01/2022,08:15:00,3,1,3,5,,,\nBob,14/01/2022,8:15,4,,,,,,\n"
        );
        match read_csv(data.as_bytes()) {
            Err(Error::Format { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Time");
            }
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn guesses_and_letters_are_range_checked() {
        let seven = format!("{HEADER}\nAlice,13/01/2022,08:15:00,7,,,,,,\n");
        assert!(matches!(
            read_csv(seven.as_bytes()),
            Err(Error::Format { .. })
        ));
        let six_letters = format!("{HEADER}\nAlice,13/01/2022,08:15:00,1,6,,,,,\n");
        assert!(matches!(
            read_csv(six_letters.as_bytes()),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn write_csv_and_json() {
        let data = format!("{HEADER}\nAlice,13/01/2022,08:15:00,3,1,3,5,,,\n");
        let rows = error_table(&read_csv(data.as_bytes()).unwrap(), None).unwrap();
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        save_error_table_csv(&rows, &csvp).unwrap();
        save_error_table_json(&rows, &jsonp).unwrap();
        let text = std::fs::read_to_string(&csvp).unwrap();
        assert!(text.contains("2022-01-13,1,08:15,0:00:00,3.00,0.00"));
        assert!(jsonp.exists());
    }
}
