//! Error types shared by every stage of a report run.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Input table is missing required columns.
    #[error("missing required columns {missing:?}; found {found:?}")]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A date, time or integer cell does not match the expected pattern.
    #[error("row {row}: cannot parse {column} value {value:?} (expected {expected})")]
    Format {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// Aggregation or binning requested on a field outside the recognized set.
    #[error("unknown field: {0:?}")]
    UnknownField(String),

    /// A person filter or bar request names a person absent from the table.
    #[error("person {0:?} does not appear in the table")]
    UnknownPerson(String),

    /// A bar request names a category that was never observed for its field.
    #[error("bin value {value} was never observed for field {field:?}")]
    UnknownBin { field: String, value: String },

    /// A bar chart was requested with an empty bin list.
    #[error("no bins requested for {0}")]
    NoBins(String),

    #[error("table contains no rows")]
    EmptyTable,

    #[error("no charts to write")]
    EmptyReport,

    /// Backend failure while drawing a chart.
    #[error("render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand used by the parsers in [`crate::time`] and [`crate::storage`].
    pub(crate) fn format(
        row: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Error::Format {
            row,
            column: column.into(),
            value: value.into(),
            expected,
        }
    }

    /// Attach a 1-based data row number to a [`Error::Format`] raised by a cell parser.
    pub(crate) fn at_row(self, n: usize) -> Self {
        match self {
            Error::Format {
                column,
                value,
                expected,
                ..
            } => Error::Format {
                row: n,
                column,
                value,
                expected,
            },
            other => other,
        }
    }

    /// Wrap any backend error the way plotters reports them (`Debug` only).
    pub(crate) fn render<E: std::fmt::Debug>(e: E) -> Self {
        Error::Render(format!("{e:?}"))
    }
}
