//! Collection pipeline errors

use std::io;
use thiserror::Error;

use crate::infrastructure::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum CollectorError {
    /// A page could not be fetched after every retry
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No buildId marker found on {url}")]
    MissingBuildId { url: String },

    #[error("Unexpected response shape from {url}: missing {path}")]
    UnexpectedShape { url: String, path: &'static str },

    #[error("Failed to write roster: {0}")]
    Io(#[from] io::Error),
}

pub type CollectorResult<T> = Result<T, CollectorError>;
