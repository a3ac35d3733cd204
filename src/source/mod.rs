//! Upstream dataset sources.
//!
//! Supports HTTP(S) endpoints and local JSON files.

mod file;
mod http;

pub use file::*;
pub use http::*;

use crate::status::{validate_sites, Site, ValidationError};

use std::time::Duration;
use thiserror::Error;

/// Fetch error types.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Http(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid dataset: {0}")]
    Invalid(#[from] ValidationError),
}

/// Where the site dataset comes from.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    File(FileSource),
}

impl Source {
    /// Pick a source from a location string: URLs go over HTTP, anything
    /// else is a file path.
    pub fn from_location(location: &str, timeout: Duration) -> Result<Self, FetchError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Source::Http(HttpSource::new(location, timeout)?))
        } else {
            Ok(Source::File(FileSource::new(location)))
        }
    }

    /// Fetch and validate the dataset.
    pub async fn fetch(&self) -> Result<Vec<Site>, FetchError> {
        let sites = match self {
            Source::Http(source) => source.fetch().await?,
            Source::File(source) => source.fetch().await?,
        };
        validate_sites(&sites)?;
        Ok(sites)
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Http(source) => format!("http: {}", source.url()),
            Source::File(source) => format!("file: {}", source.path().display()),
        }
    }
}

/// Decode the inbound contract: a JSON array of sites.
pub fn decode_sites(body: &[u8]) -> Result<Vec<Site>, FetchError> {
    Ok(serde_json::from_slice(body)?)
}
