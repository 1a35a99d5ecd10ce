use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("line {line}: column {column} is not a number: {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: column {column} is negative: {value}")]
    NegativeQuantity {
        line: u64,
        column: &'static str,
        value: f64,
    },

    #[error("line {line}: Date is not a recognised calendar date: {value:?}")]
    InvalidDate { line: u64, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
