//! Normalization of the raw `Date` and `Time` cells.
//!
//! Dates become [`NaiveDate`] group keys. Times of day become whole seconds since
//! midnight so they can be summed and averaged like any other number, then turned back
//! into an `HH:MM` clock label for display. All times are naive local times.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})$").expect("static regex"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("static regex"));

/// Duration since midnight, in whole seconds (`0..86_400`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub fn from_hms(h: u32, m: u32, s: u32) -> Option<Self> {
        (h < 24 && m < 60 && s < 60).then_some(TimeOfDay(h * 3600 + m * 60 + s))
    }

    pub fn seconds(self) -> u32 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = (self.0 / 3600, (self.0 / 60) % 60, self.0 % 60);
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// Parse an `HH:MM:SS` cell.
pub fn parse_time_of_day(raw: &str) -> Result<TimeOfDay> {
    let bad = || Error::format(0, "Time", raw, "HH:MM:SS");
    let caps = TIME_RE.captures(raw.trim()).ok_or_else(bad)?;
    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| bad());
    TimeOfDay::from_hms(field(1)?, field(2)?, field(3)?).ok_or_else(bad)
}

/// Parse a `DD/MM/YYYY` cell.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let bad = || Error::format(0, "Date", raw, "DD/MM/YYYY");
    let caps = DATE_RE.captures(raw.trim()).ok_or_else(bad)?;
    let day = caps[1].parse::<u32>().map_err(|_| bad())?;
    let month = caps[2].parse::<u32>().map_err(|_| bad())?;
    let year = caps[3].parse::<i32>().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Clock label (`HH:MM`) for a number of seconds since midnight.
///
/// Rounds to the nearest minute and wraps at 24 h, so fractional means coming out of
/// the aggregation engine can be fed in directly.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "--:--".to_string();
    }
    let minutes = (seconds / 60.0).round() as i64;
    let minutes = minutes.rem_euclid((SECONDS_PER_DAY / 60) as i64);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `H:MM:SS` rendering of a non-negative span (used for standard deviations).
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "NA".to_string();
    }
    let total = seconds.abs().round() as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}
