use crate::value::DataType;
use thiserror::Error;

pub type AnonymizationResult<T> = Result<T, AnonymizationError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnonymizationError {
    #[error("cannot parse {text:?} as {data_type}: {reason}")]
    Parse {
        data_type: DataType,
        text: String,
        reason: String,
    },

    #[error("malformed row: expected {expected} fields, found {found}")]
    MalformedRow { expected: usize, found: usize },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("unknown column: {0}")]
    UnknownColumn(String),
}
