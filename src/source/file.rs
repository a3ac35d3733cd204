//! File-based dataset source.

use super::{decode_sites, FetchError};
use crate::status::Site;

use std::path::{Path, PathBuf};

/// Reads the dataset from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn fetch(&self) -> Result<Vec<Site>, FetchError> {
        let body = tokio::fs::read(&self.path).await?;
        decode_sites(&body)
    }
}
