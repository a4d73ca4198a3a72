//! Report error types.

use std::path::{Path, PathBuf};

use thiserror::Error;
use vkfriends_core::CoreError;
use vkfriends_fetch::FetchError;

/// Errors that can occur while generating a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Fetching or validating a page failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration or field transform error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Writing the report file failed.
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        /// The report file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a delimited row failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    /// Creates an IO error for the given report path.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true if the server could not be reached or answered with a
    /// non-200 status.
    pub fn is_server_response(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_server_response())
    }

    /// Returns true if the API rejected the request parameters.
    pub fn is_api_parameter(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_api_parameter())
    }
}
