//! Report generation pipeline.
//!
//! A report is written in four steps: the document preamble, one chunk per
//! friend record, optional trimming of the last record's separator, and the
//! document conclusion. [`ReportDocument`] provides the bytes for each step;
//! [`ReportGenerator`] picks the implementation once from the requested
//! format and drives the page stream into the report file.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use tracing::{debug, info, instrument, warn};
use vkfriends_core::{CoreError, FetchConfig, PageResult, Record, ReportFormat};
use vkfriends_fetch::FetchError;

use crate::delimited::DelimitedReport;
use crate::error::ReportError;
use crate::json::JsonReport;
use crate::path::resolve_report_path;

// ============================================================================
// Report Context
// ============================================================================

/// Run metadata every report document is built from.
#[derive(Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// Access token written into the preamble.
    pub auth_token: String,
    /// Target user id written into the preamble.
    pub user_id: String,
    /// Configured fields, in output order.
    pub fields: Vec<String>,
}

impl ReportContext {
    /// Builds the context from a run configuration.
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            auth_token: config.auth_token().to_string(),
            user_id: config.user_id().to_string(),
            fields: config.fields().to_vec(),
        }
    }
}

impl std::fmt::Debug for ReportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportContext")
            .field("auth_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("fields", &self.fields)
            .finish()
    }
}

// ============================================================================
// Report Document
// ============================================================================

/// Byte-level framing of one report format.
pub trait ReportDocument {
    /// The format this document writes.
    fn format(&self) -> ReportFormat;

    /// Bytes written before the first record.
    ///
    /// # Errors
    ///
    /// Returns an error if the preamble cannot be encoded.
    fn initialize_document(&self) -> Result<Vec<u8>, ReportError>;

    /// Bytes written for one record.
    ///
    /// # Errors
    ///
    /// Returns an error if a field transform rejects a value.
    fn prepare_item(&self, record: &Record) -> Result<Vec<u8>, ReportError>;

    /// Bytes written after the last record.
    fn conclude_document(&self) -> &'static [u8];

    /// Length of the separator every record ends with that must be trimmed
    /// after the last record.
    fn trailing_separator_len(&self) -> u64 {
        0
    }
}

/// Checks a page before its records are used.
///
/// # Errors
///
/// Returns [`FetchError::ServerResponse`] for a non-200 status and
/// [`FetchError::ApiParameter`] for an API error payload.
pub fn validate_page(page: &PageResult) -> Result<(), FetchError> {
    if !page.is_ok_status() {
        return Err(FetchError::bad_status(page.status_code, &page.reason));
    }

    match page.api_error() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

// ============================================================================
// Report Summary
// ============================================================================

/// Outcome of a successful report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// The file the report was written to.
    pub path: PathBuf,
    /// The report format.
    pub format: ReportFormat,
    /// Pages consumed from the stream.
    pub pages: usize,
    /// Records written.
    pub records: usize,
    /// Items skipped because they were not JSON objects.
    pub skipped: usize,
}

// ============================================================================
// Report Generator
// ============================================================================

/// A report writer for one format.
#[derive(Debug, Clone)]
pub enum ReportGenerator {
    /// Comma-separated report.
    Csv(ReportTarget<DelimitedReport>),
    /// Tab-separated report.
    Tsv(ReportTarget<DelimitedReport>),
    /// JSON document report.
    Json(ReportTarget<JsonReport>),
}

/// A report document together with the file it is written to.
#[derive(Debug, Clone)]
pub struct ReportTarget<D> {
    document: D,
    path: PathBuf,
}

impl ReportGenerator {
    /// Creates a generator for `format`, writing to the file resolved from
    /// `report_path`.
    pub fn new(format: ReportFormat, config: &FetchConfig, report_path: &Path) -> Self {
        let context = ReportContext::from_config(config);
        let path = resolve_report_path(report_path, format);

        match format {
            ReportFormat::Csv => Self::Csv(ReportTarget {
                document: DelimitedReport::csv(context),
                path,
            }),
            ReportFormat::Tsv => Self::Tsv(ReportTarget {
                document: DelimitedReport::tsv(context),
                path,
            }),
            ReportFormat::Json => Self::Json(ReportTarget {
                document: JsonReport::new(context),
                path,
            }),
        }
    }

    /// Creates a generator from a format name such as `"csv"` or `"JSON"`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedFormat`] for unknown names.
    pub fn from_format_name(
        name: &str,
        config: &FetchConfig,
        report_path: &Path,
    ) -> Result<Self, CoreError> {
        let format = name.parse::<ReportFormat>()?;
        Ok(Self::new(format, config, report_path))
    }

    /// Returns the report format.
    pub fn format(&self) -> ReportFormat {
        match self {
            Self::Csv(target) | Self::Tsv(target) => target.document.format(),
            Self::Json(target) => target.document.format(),
        }
    }

    /// Returns the file the report is written to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Csv(target) | Self::Tsv(target) => &target.path,
            Self::Json(target) => &target.path,
        }
    }

    /// Returns the file extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        self.format().extension()
    }

    /// Writes every page of `pages` into the report file.
    ///
    /// The file is created (or truncated) before the first page is polled.
    /// On failure the partially written file is left in place.
    ///
    /// # Errors
    ///
    /// Returns the first fetch, validation, transform or IO error.
    #[instrument(skip_all, fields(format = %self.format(), path = %self.path().display()))]
    pub async fn generate_report<S>(&self, pages: S) -> Result<ReportSummary, ReportError>
    where
        S: Stream<Item = Result<PageResult, FetchError>>,
    {
        match self {
            Self::Csv(target) | Self::Tsv(target) => write_report(target, pages).await,
            Self::Json(target) => write_report(target, pages).await,
        }
    }
}

async fn write_report<D, S>(target: &ReportTarget<D>, pages: S) -> Result<ReportSummary, ReportError>
where
    D: ReportDocument,
    S: Stream<Item = Result<PageResult, FetchError>>,
{
    let path = target.path.as_path();
    let document = &target.document;
    let io_err = |e| ReportError::io(path, e);

    info!("Creating file {}", path.display());
    let file = File::create(path).map_err(io_err)?;
    let mut sink = BufWriter::new(file);
    sink.write_all(&document.initialize_document()?).map_err(io_err)?;

    futures::pin_mut!(pages);
    let mut page_count = 0;
    let mut records = 0;
    let mut skipped = 0;

    while let Some(page) = pages.next().await {
        let page = page?;
        page_count += 1;
        validate_page(&page)?;

        if !page.has_success_shape() {
            warn!(status = page.status_code, "Page carries neither items nor an error");
            continue;
        }

        for item in page.items().unwrap_or_default() {
            let Some(record) = item.as_object() else {
                warn!(page = page_count, %item, "Skipping friend entry that is not an object");
                skipped += 1;
                continue;
            };
            sink.write_all(&document.prepare_item(record)?).map_err(io_err)?;
            records += 1;
        }
        debug!(page = page_count, records, "Page written");
    }

    let separator = document.trailing_separator_len();
    if records > 0 && separator > 0 {
        sink.flush().map_err(io_err)?;
        let file = sink.get_mut();
        let end = file.seek(SeekFrom::End(0)).map_err(io_err)?;
        file.set_len(end.saturating_sub(separator)).map_err(io_err)?;
        file.seek(SeekFrom::End(0)).map_err(io_err)?;
    }

    sink.write_all(document.conclude_document()).map_err(io_err)?;
    sink.flush().map_err(io_err)?;

    info!("Saving report into {}", path.display());
    Ok(ReportSummary {
        path: path.to_path_buf(),
        format: document.format(),
        pages: page_count,
        records,
        skipped,
    })
}
