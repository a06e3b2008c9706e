//! Input records, the loaded table and the typed field descriptors used for binning.

use crate::error::{Error, Result};
use crate::time::TimeOfDay;
use ahash::AHashSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of guesses a puzzle allows (and of `Correct Letters Guess N` columns).
pub const MAX_GUESSES: u8 = 6;

/// One attempt: a person's result for one day's puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub person: String,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub guesses: u8,
    /// Correct letters after guess 1..=6; `None` past the solving guess.
    pub correct_letters: [Option<u8>; MAX_GUESSES as usize],
}

impl Record {
    pub fn new(person: impl Into<String>, date: NaiveDate, time: TimeOfDay, guesses: u8) -> Self {
        Self {
            person: person.into(),
            date,
            time,
            guesses,
            correct_letters: [None; MAX_GUESSES as usize],
        }
    }

    /// Builder-style setter for the per-guess correct-letter counts.
    pub fn with_letters(mut self, letters: &[u8]) -> Self {
        for (slot, n) in self.correct_letters.iter_mut().zip(letters) {
            *slot = Some(*n);
        }
        self
    }

    /// Correct letters after guess `n` (1-based).
    pub fn letters_after(&self, n: u8) -> Option<u8> {
        let idx = usize::from(n.checked_sub(1)?);
        self.correct_letters.get(idx).copied().flatten()
    }
}

/// Validated, immutable table of records.
///
/// Distinct persons and dates are captured once, in first-observed order; the
/// aggregation engine relies on that order for its output.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Record>,
    persons: Vec<String>,
    dates: Vec<NaiveDate>,
}

impl Table {
    pub fn new(rows: Vec<Record>) -> Self {
        let mut seen_p = AHashSet::new();
        let mut seen_d = AHashSet::new();
        let mut persons = Vec::new();
        let mut dates = Vec::new();
        for r in &rows {
            if seen_p.insert(r.person.as_str()) {
                persons.push(r.person.clone());
            }
            if seen_d.insert(r.date) {
                dates.push(r.date);
            }
        }
        Self {
            rows,
            persons,
            dates,
        }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn distinct_persons(&self) -> &[String] {
        &self.persons
    }

    pub fn distinct_dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn has_person(&self, person: &str) -> bool {
        self.persons.iter().any(|p| p == person)
    }

    /// Rows belonging to `person`, in table order.
    pub fn for_person(&self, person: &str) -> Result<Vec<&Record>> {
        if !self.has_person(person) {
            return Err(Error::UnknownPerson(person.to_string()));
        }
        Ok(self.rows.iter().filter(|r| r.person == person).collect())
    }

    /// Distinct values of `field` over the whole table, in first-observed order.
    pub fn distinct_bins(&self, field: BinField) -> Vec<BinKey> {
        match field {
            BinField::Date => self.dates.iter().copied().map(BinKey::Date).collect(),
            BinField::Person => self.persons.iter().cloned().map(BinKey::Person).collect(),
            BinField::CorrectLetters(_) => {
                let mut seen = AHashSet::new();
                self.rows
                    .iter()
                    .filter_map(|r| field.key_of(r))
                    .filter(|k| seen.insert(k.clone()))
                    .collect()
            }
        }
    }
}

/// Field a table can be binned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinField {
    Date,
    Person,
    /// `Correct Letters Guess N`, N in 1..=6.
    CorrectLetters(u8),
}

impl BinField {
    pub fn correct_letters(n: u8) -> Result<Self> {
        if (1..=MAX_GUESSES).contains(&n) {
            Ok(BinField::CorrectLetters(n))
        } else {
            Err(Error::UnknownField(format!("Correct Letters Guess {n}")))
        }
    }

    /// Reject a `CorrectLetters` field built directly with a guess outside 1..=6.
    pub fn validate(self) -> Result<Self> {
        match self {
            BinField::CorrectLetters(n) => Self::correct_letters(n),
            other => Ok(other),
        }
    }

    /// Column name as it appears in the input header.
    pub fn column_name(&self) -> String {
        match self {
            BinField::Date => "Date".to_string(),
            BinField::Person => "Person".to_string(),
            BinField::CorrectLetters(n) => format!("Correct Letters Guess {n}"),
        }
    }

    /// Bin key of `record`, or `None` when the record has no value for this field.
    pub fn key_of(&self, record: &Record) -> Option<BinKey> {
        match self {
            BinField::Date => Some(BinKey::Date(record.date)),
            BinField::Person => Some(BinKey::Person(record.person.clone())),
            BinField::CorrectLetters(n) => record.letters_after(*n).map(BinKey::Category),
        }
    }

    /// Whether `key` is of the variant this field produces.
    pub fn accepts(&self, key: &BinKey) -> bool {
        matches!(
            (self, key),
            (BinField::Date, BinKey::Date(_))
                | (BinField::Person, BinKey::Person(_))
                | (BinField::CorrectLetters(_), BinKey::Category(_))
        )
    }
}

impl fmt::Display for BinField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

impl FromStr for BinField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "date" => Ok(BinField::Date),
            "person" => Ok(BinField::Person),
            _ => norm
                .strip_prefix("correct letters guess ")
                .and_then(|n| n.trim().parse::<u8>().ok())
                .filter(|n| (1..=MAX_GUESSES).contains(n))
                .map(BinField::CorrectLetters)
                .ok_or_else(|| Error::UnknownField(s.to_string())),
        }
    }
}

/// Field averaged within each bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetField {
    /// Completion time of day, averaged as seconds since midnight.
    Time,
    NumberOfGuesses,
}

impl TargetField {
    pub fn column_name(&self) -> &'static str {
        match self {
            TargetField::Time => "Time",
            TargetField::NumberOfGuesses => "Number of Guesses",
        }
    }

    pub fn value_of(&self, record: &Record) -> f64 {
        match self {
            TargetField::Time => record.time.as_secs_f64(),
            TargetField::NumberOfGuesses => f64::from(record.guesses),
        }
    }

    /// Duration-valued fields get clock-style axis labels.
    pub fn is_duration(&self) -> bool {
        matches!(self, TargetField::Time)
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            TargetField::Time => "Time (O'Clock)",
            TargetField::NumberOfGuesses => "Average number of guesses",
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for TargetField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(TargetField::Time),
            "number of guesses" | "guesses" => Ok(TargetField::NumberOfGuesses),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

/// Value of a bin: its type follows the [`BinField`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BinKey {
    Date(NaiveDate),
    Person(String),
    Category(u8),
}

impl From<&str> for BinKey {
    fn from(person: &str) -> Self {
        BinKey::Person(person.to_string())
    }
}

impl fmt::Display for BinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinKey::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            BinKey::Person(p) => f.write_str(p),
            BinKey::Category(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, day).unwrap()
    }

    fn t(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::from_hms(h, m, 0).unwrap()
    }

    #[test]
    fn table_tracks_first_observed_order() {
        let table = Table::new(vec![
            Record::new("Zoe", d(14), t(9, 0), 3),
            Record::new("Adam", d(13), t(9, 0), 3),
            Record::new("Zoe", d(13), t(9, 0), 3),
        ]);
        assert_eq!(table.distinct_persons(), ["Zoe", "Adam"]);
        assert_eq!(table.distinct_dates(), [d(14), d(13)]);
    }

    #[test]
    fn parses_field_names() {
        assert_eq!("Date".parse::<BinField>().unwrap(), BinField::Date);
        assert_eq!(
            "Correct Letters Guess 4".parse::<BinField>().unwrap(),
            BinField::CorrectLetters(4)
        );
        assert!(matches!(
            "Correct Letters Guess 7".parse::<BinField>(),
            Err(Error::UnknownField(_))
        ));
        assert!(matches!(
            "NotAField".parse::<BinField>(),
            Err(Error::UnknownField(_))
        ));
        assert_eq!(
            "Number of Guesses".parse::<TargetField>().unwrap(),
            TargetField::NumberOfGuesses
        );
        assert!("Person".parse::<TargetField>().is_err());
    }

    #[test]
    fn letter_bins_skip_missing_counts() {
        let table = Table::new(vec![
            Record::new("A", d(13), t(9, 0), 1).with_letters(&[5]),
            Record::new("B", d(13), t(9, 0), 3).with_letters(&[2, 4, 5]),
            Record::new("C", d(13), t(9, 0), 2).with_letters(&[2, 5]),
        ]);
        let bins = table.distinct_bins(BinField::CorrectLetters(2));
        assert_eq!(bins, vec![BinKey::Category(4), BinKey::Category(5)]);
        assert_eq!(table.rows()[0].letters_after(2), None);
        assert_eq!(table.rows()[0].letters_after(0), None);
    }
}
