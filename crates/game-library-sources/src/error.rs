use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No snapshot in {}; run `axiom fetch` while online first", .0.display())]
    MissingSnapshot(PathBuf),

    #[error("{0} is read-only")]
    ReadOnly(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_) | BackendError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
