//! View error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Region not found: {0}")]
    MissingRegion(String),

    #[error("Duplicate element id: {0}")]
    DuplicateId(String),
}

pub type ViewResult<T> = Result<T, ViewError>;
