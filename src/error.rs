use crate::cache::error::CacheError;
use crate::request::error::RequestError;
use crate::retrieve::error::RetrieveError;
use crate::transforms::TransformError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Era5Error {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Failed to retrieve '{path}'")]
    Retrieve {
        path: PathBuf,
        #[source]
        source: RetrieveError,
    },

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
