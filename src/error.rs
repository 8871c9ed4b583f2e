use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("input has no header row")]
    EmptyHeader,

    #[error("column `{0}` appears more than once in the header")]
    DuplicateColumn(String),

    #[error("column `{0}` does not exist")]
    MissingColumn(String),

    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("null value in column `{column}` at row {row}")]
    NullValue { column: String, row: usize },

    #[error("column `{column}` of type {data_type} cannot be used as a numeric feature")]
    NotNumeric { column: String, data_type: String },

    #[error("column `{column}` has {distinct} distinct values, more than the {max} allowed for a string column")]
    TooManyCategories {
        column: String,
        distinct: usize,
        max: usize,
    },

    #[error("value `{value}` of column `{column}` was not seen while fitting")]
    UnseenCategory { column: String, value: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("solver produced a non-finite {0}")]
    NonFinite(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}
