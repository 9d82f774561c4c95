use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutreachError>;

#[derive(Debug, Error)]
pub enum OutreachError {
    #[error("no template for business type: {0}")]
    UnknownCategory(String),

    #[error("no business type matches category: {0}")]
    UnrecognizedCategory(String),

    #[error("template placeholder has no value: {{{0}}}")]
    MissingField(String),

    #[error("mail dispatch failed: {0}")]
    DispatchFailure(String),

    #[error("input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("no mail credentials: set GMAIL_ACCESS_TOKEN or provide {}", .0.display())]
    MissingCredentials(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
