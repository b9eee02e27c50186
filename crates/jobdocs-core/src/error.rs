use std::io;

use thiserror::Error;

use crate::decode::ParseWarning;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Job not found: {0}")]
    JobNotFound(String),
    #[error("No line items added")]
    NoLineItems,
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Parse error: {0}")]
    Parse(ParseWarning),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
