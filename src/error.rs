use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid keyword configuration: {0}")]
    InvalidKeywords(String),

    #[error("failed to read keyword configuration: {0}")]
    KeywordConfig(#[from] serde_json::Error),
}

/// Failure of the structured table reader. Always recovered by the manual
/// cell-by-cell reader, never returned to callers.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TableParseError {
    #[error("table has no direct rows")]
    NoRows,

    #[error("cell span {span} exceeds limit {limit}")]
    SpanTooLarge { span: usize, limit: usize },

    #[error("table grid has no columns")]
    NoColumns,
}
