//! wordle_plotter
//!
//! A small Rust library for aggregating a daily word-puzzle log and rendering
//! comparative charts from it. Pairs with the `wordleplot` CLI.
//!
//! ### Features
//! - Load and validate a CSV log (person, date, completion time, guesses, correct letters)
//! - Mean and standard deviation by date, person or correct-letter count
//! - Per-person trends drawn over a muted population backdrop, with stable colors
//! - Bar comparisons over any ordered set of bins
//! - SVG/PNG output, one page per chart, stacked or split into files
//!
//! ### Example
//! ```no_run
//! use wordle_plotter::{ReportConfig, build_report, storage};
//! use wordle_plotter::document::{DocumentSink, PagedDocument};
//!
//! let table = storage::load_csv("wordle.csv")?;
//! let config = ReportConfig::default();
//! let mut charts = build_report(&table, &config)?;
//! PagedDocument::from_config(&config, false)
//!     .write_all(charts.drain(), std::path::Path::new("report.svg"))?;
//! # Ok::<(), wordle_plotter::Error>(())
//! ```

pub mod collector;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod report;
pub mod stats;
pub mod storage;
pub mod style;
pub mod time;
pub mod viz;

pub use collector::FigureCollector;
pub use config::ReportConfig;
pub use error::{Error, Result};
pub use models::{BinField, BinKey, Record, Table, TargetField};
pub use report::build_report;
pub use stats::{AggregateMode, AggregateRow, aggregate, aggregate_bins};
pub use style::{ColorRegistry, Rgb8};
