//! Top-level entry point tying fetching and report writing together.

use std::path::PathBuf;

use futures::Stream;
use tracing::info;
use vkfriends_core::{CoreError, FetchConfig, PageResult, ReportFormat};
use vkfriends_fetch::{FetchError, FriendPages, FriendsApiClient};

use crate::error::ReportError;
use crate::generator::{ReportGenerator, ReportSummary};

/// Exports one user's friend list into a report file.
#[derive(Debug, Clone)]
pub struct VkFriends {
    config: FetchConfig,
    format: ReportFormat,
    report_path: PathBuf,
}

impl VkFriends {
    /// Creates an exporter for the given run.
    pub fn new(config: FetchConfig, format: ReportFormat, report_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            format,
            report_path: report_path.into(),
        }
    }

    /// Creates an exporter from a format name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedFormat`] for unknown names.
    pub fn with_format_name(
        config: FetchConfig,
        format: &str,
        report_path: impl Into<PathBuf>,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(config, format.parse()?, report_path))
    }

    /// Returns the report format.
    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Returns the lazy sequence of friend list pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn fetch_friend_list(
        &self,
    ) -> Result<impl Stream<Item = Result<PageResult, FetchError>> + use<>, FetchError> {
        let client = FriendsApiClient::new(&self.config)?;
        Ok(FriendPages::new(client, &self.config).into_stream())
    }

    /// Fetches the whole friend list and writes the report.
    ///
    /// # Errors
    ///
    /// Returns the first fetch, validation, transform or IO error.
    pub async fn generate_report(&self) -> Result<ReportSummary, ReportError> {
        let generator = ReportGenerator::new(self.format, &self.config, &self.report_path);
        let pages = self.fetch_friend_list()?;
        let summary = generator.generate_report(pages).await?;

        info!(
            records = summary.records,
            skipped = summary.skipped,
            pages = summary.pages,
            "Report written to {}",
            summary.path.display()
        );
        Ok(summary)
    }
}
