use thiserror::Error;


/// Failures raised while validating or loading a transform set.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid distribution: probabilities sum to {sum}, expected 1")]
    InvalidDistribution { sum: f64 },

    #[error("invalid distribution: transform {index} has negative probability {probability}")]
    NegativeProbability { index: usize, probability: f64 },

    #[error("transform table parse error: {0}")]
    Parse(#[from] ParseError),
}


/// Malformed transform-table input. Row and column numbers are 1-based.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("transform table is empty")]
    Empty,

    #[error("row {row} has {found} fields, expected 7 (a, b, c, d, e, f, probability)")]
    FieldCount { row: usize, found: usize },

    #[error("row {row}, column {column}: {value:?} is not a finite number")]
    InvalidNumber { row: usize, column: usize, value: String },

    #[error("transform table has {found} rows, at least {required} are required")]
    TooFewRows { found: usize, required: usize },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}


pub type Result<T> = std::result::Result<T, Error>;
