use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download stream from {0} broke off")]
    Stream(String, #[source] std::io::Error),

    #[error("I/O error writing download for '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to move finished download to '{0}'")]
    Persist(PathBuf, #[source] std::io::Error),

    #[error("Retrieval failed: {0}")]
    Other(String),
}
