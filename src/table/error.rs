use thiserror::Error;

/// Contract violations detected while building or checking an indicator table.
///
/// Rows are reported 1-based, counting data rows only (the CSV header is not a row).
#[derive(Debug, Error)]
pub enum TableError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}', row {row}: '{raw}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        raw: String,
    },

    #[error("column '{column}', row {row}: negative value {value}")]
    Negative {
        column: String,
        row: usize,
        value: f64,
    },

    #[error("column '{column}', row {row}: value is not finite")]
    NonFinite { column: String, row: usize },

    #[error("column '{column}', row {row}: months served must be positive, got {value}")]
    InvalidTenure {
        column: String,
        row: usize,
        value: f64,
    },

    #[error("row {row}: expected {expected} indicator values, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid delimiter '{0}': must be a single ASCII character")]
    Delimiter(String),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}
