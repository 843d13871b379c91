use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning the source CSV into the enriched table.
///
/// Line numbers are 1-based and count the header as line 1; `row` counts
/// data rows only, starting at 1.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected at least 6 columns, found {found}")]
    Schema { line: u64, found: usize },

    #[error("line {line}: cannot parse {value:?} as a date")]
    Date { line: u64, value: String },

    #[error("line {line}: column {column} has non-integer value {value:?}")]
    Value {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {column} does not fit in a 64-bit integer")]
    Overflow { row: usize, column: &'static str },
}
