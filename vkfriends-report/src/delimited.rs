//! CSV and TSV report documents.

use std::borrow::Cow;

use csv::{Terminator, WriterBuilder};
use serde_json::Value;
use vkfriends_core::{Record, ReportFormat};

use crate::error::ReportError;
use crate::fields::PreparedItem;
use crate::generator::{ReportContext, ReportDocument};

/// UTF-8 byte-order mark written at the start of delimited reports.
pub const BOM: &str = "\u{feff}";

/// Delimited document: BOM, `#` comment preamble, header row, one row per
/// record, CRLF line endings.
#[derive(Debug, Clone)]
pub struct DelimitedReport {
    context: ReportContext,
    format: ReportFormat,
    delimiter: u8,
}

impl DelimitedReport {
    /// Comma-separated report.
    pub fn csv(context: ReportContext) -> Self {
        Self {
            context,
            format: ReportFormat::Csv,
            delimiter: b',',
        }
    }

    /// Tab-separated report.
    pub fn tsv(context: ReportContext) -> Self {
        Self {
            context,
            format: ReportFormat::Tsv,
            delimiter: b'\t',
        }
    }

    fn encode_row<I, T>(&self, row: I) -> Result<Vec<u8>, ReportError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());
        writer.write_record(row)?;
        writer
            .into_inner()
            .map_err(|e| ReportError::Csv(csv::Error::from(e.into_error())))
    }
}

/// Renders a prepared value as a delimited cell.
pub fn cell(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

impl ReportDocument for DelimitedReport {
    fn format(&self) -> ReportFormat {
        self.format
    }

    fn initialize_document(&self) -> Result<Vec<u8>, ReportError> {
        let mut document = format!(
            "{BOM}# auth_token: {}\n# user_id: {}\n",
            self.context.auth_token, self.context.user_id
        )
        .into_bytes();
        document.extend(self.encode_row(&self.context.fields)?);
        Ok(document)
    }

    fn prepare_item(&self, record: &Record) -> Result<Vec<u8>, ReportError> {
        let item = PreparedItem::from_record(&self.context.fields, record)?;
        self.encode_row(item.values().map(|value| cell(value).into_owned()))
    }

    fn conclude_document(&self) -> &'static [u8] {
        b""
    }
}
