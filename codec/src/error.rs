//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("insufficient bytes at offset {offset}: required {required}, available {available}")]
    InsufficientBytes {
        required: usize,
        available: usize,
        offset: usize,
    },
    #[error("invalid offset {offset} for buffer of length {len}")]
    InvalidOffset { offset: usize, len: usize },
    #[error("invalid data in {0}: {1}")]
    InvalidData(String, String), // context, message
    #[error("cannot size a variable-size codec without a value")]
    MissingValue,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
}
