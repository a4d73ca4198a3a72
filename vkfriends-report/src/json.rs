//! JSON report document.
//!
//! The document is streamed: the `friends` array is opened by the preamble,
//! every record is written as an indented object followed by `,\n`, and the
//! separator after the last record is trimmed before the array is closed.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use vkfriends_core::{CoreError, Record, ReportFormat};

use crate::error::ReportError;
use crate::fields::PreparedItem;
use crate::generator::{ReportContext, ReportDocument};

/// Indent of a record's fields inside the `friends` array.
const FIELD_INDENT: &[u8] = b"      ";

/// Indent of a record's braces inside the `friends` array.
const ITEM_INDENT: &str = "    ";

/// Separator written after every record.
const ITEM_SEPARATOR: &str = ",\n";

/// JSON document with the run metadata and a `friends` array.
#[derive(Debug, Clone)]
pub struct JsonReport {
    context: ReportContext,
}

impl JsonReport {
    /// Creates the document for the given run.
    pub fn new(context: ReportContext) -> Self {
        Self { context }
    }
}

impl ReportDocument for JsonReport {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn initialize_document(&self) -> Result<Vec<u8>, ReportError> {
        let auth_token = Value::String(self.context.auth_token.clone());
        let user_id = Value::String(self.context.user_id.clone());
        Ok(format!(
            "{{\n  \"auth_token\": {auth_token},\n  \"user_id\": {user_id},\n  \"friends\": [\n"
        )
        .into_bytes())
    }

    fn prepare_item(&self, record: &Record) -> Result<Vec<u8>, ReportError> {
        let item = PreparedItem::from_record(&self.context.fields, record)?;

        let mut body = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(FIELD_INDENT));
        item.serialize(&mut serializer).map_err(CoreError::from)?;

        // Closing brace is re-emitted at item indent.
        body.pop();

        let mut chunk = Vec::with_capacity(body.len() + 16);
        chunk.extend_from_slice(ITEM_INDENT.as_bytes());
        chunk.extend_from_slice(&body);
        chunk.extend_from_slice(ITEM_INDENT.as_bytes());
        chunk.extend_from_slice(b"}");
        chunk.extend_from_slice(ITEM_SEPARATOR.as_bytes());
        Ok(chunk)
    }

    fn conclude_document(&self) -> &'static [u8] {
        b"\n  ]\n}"
    }

    fn trailing_separator_len(&self) -> u64 {
        ITEM_SEPARATOR.len() as u64
    }
}
