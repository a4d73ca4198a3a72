//! One API response per page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One friend entry: an open mapping of field name to value.
pub type Record = serde_json::Map<String, Value>;

// ============================================================================
// API Error
// ============================================================================

/// Error payload returned by the API when it rejects a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// API error code.
    #[serde(default)]
    pub error_code: i64,
    /// Human-readable error message.
    #[serde(default)]
    pub error_msg: String,
}

// ============================================================================
// Page Result
// ============================================================================

/// A single API response: HTTP status, reason phrase and the raw payload.
///
/// The payload is either the success shape
/// `{"response": {"count": N, "items": [...]}}` or the error shape
/// `{"error": {"error_code": N, "error_msg": "..."}}`. It is kept raw so the
/// consumer can inspect whichever shape arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// HTTP status code.
    pub status_code: u16,
    /// HTTP reason phrase.
    pub reason: String,
    /// Raw JSON body. `Null` when a non-200 body was not JSON.
    pub payload: Value,
}

impl PageResult {
    /// Creates a page result.
    pub fn new(status_code: u16, reason: impl Into<String>, payload: Value) -> Self {
        Self {
            status_code,
            reason: reason.into(),
            payload,
        }
    }

    /// Returns true if the HTTP status is 200.
    pub fn is_ok_status(&self) -> bool {
        self.status_code == 200
    }

    /// Returns the item list of the success shape, if present.
    pub fn items(&self) -> Option<&[Value]> {
        self.payload
            .get("response")
            .and_then(|response| response.get("items"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Returns true if the payload carries the success shape.
    pub fn has_success_shape(&self) -> bool {
        self.items().is_some()
    }

    /// Returns the friend records of the success shape.
    ///
    /// Items that are not JSON objects are not yielded; use [`Self::items`]
    /// to see every entry.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.items()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_object)
    }

    /// Total number of friends reported by the API.
    pub fn total_count(&self) -> Option<u64> {
        self.payload
            .get("response")
            .and_then(|response| response.get("count"))
            .and_then(Value::as_u64)
    }

    /// Returns the API error payload, if present.
    ///
    /// An error object that does not match the expected shape is still
    /// reported, with code 0 and the raw object as message.
    pub fn api_error(&self) -> Option<ApiError> {
        let error = self.payload.get("error")?;
        Some(
            serde_json::from_value::<ApiError>(error.clone()).unwrap_or_else(|_| ApiError {
                error_code: 0,
                error_msg: error.to_string(),
            }),
        )
    }
}
