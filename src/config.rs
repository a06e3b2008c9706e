//! Run configuration: date window, page geometry and fixed person colors.

use crate::error::Result;
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// First day of puzzle logging; left edge of every date axis.
pub const CAMPAIGN_START: NaiveDate = match NaiveDate::from_ymd_opt(2022, 1, 13) {
    Some(d) => d,
    None => panic!("invalid campaign start"),
};

pub const DEFAULT_PAGE_WIDTH: u32 = 1000;
pub const DEFAULT_PAGE_HEIGHT: u32 = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub campaign_start: NaiveDate,
    /// Overrides the local date used for the right edge of date axes.
    pub today: Option<NaiveDate>,
    pub page_width: u32,
    pub page_height: u32,
    /// Person -> `#RRGGBB`. Merged over the built-in table in [`crate::style`].
    pub known_colors: BTreeMap<String, String>,
    /// Guesses (1..=6) that get a "guesses by correct letters" bar chart.
    pub letter_guesses: Vec<u8>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            campaign_start: CAMPAIGN_START,
            today: None,
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            known_colors: BTreeMap::new(),
            letter_guesses: vec![1, 2],
        }
    }
}

impl ReportConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Inclusive date window shown on date axes: campaign start through today + 1 day.
    pub fn date_window(&self) -> (NaiveDate, NaiveDate) {
        let today = self.today();
        let end = today.checked_add_days(Days::new(1)).unwrap_or(today);
        (self.campaign_start, end.max(self.campaign_start))
    }
}
