//! Fetch error types.

use thiserror::Error;
use vkfriends_core::ApiError;

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or a response that is not a usable HTTP 200.
    #[error("Server response error: {message}")]
    ServerResponse {
        /// What went wrong.
        message: String,
        /// The underlying HTTP client error, if any.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The API accepted the connection but rejected the request.
    #[error("Could not properly request API. Status code: {code}; Error: {message}")]
    ApiParameter {
        /// API error code.
        code: i64,
        /// API error message.
        message: String,
    },
}

impl FetchError {
    /// Creates a server response error without an underlying cause.
    pub fn server_response(message: impl Into<String>) -> Self {
        Self::ServerResponse {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a server response error for a non-200 status.
    pub fn bad_status(status_code: u16, reason: &str) -> Self {
        Self::server_response(format!(
            "Could not get proper response from API. Status code: {status_code}; Error: {reason}"
        ))
    }

    /// Returns true if this is a server response error.
    pub fn is_server_response(&self) -> bool {
        matches!(self, Self::ServerResponse { .. })
    }

    /// Returns true if this is an API parameter error.
    pub fn is_api_parameter(&self) -> bool {
        matches!(self, Self::ApiParameter { .. })
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        Self::ApiParameter {
            code: err.error_code,
            message: err.error_msg,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() && err.is_timeout() {
            "connection timed out"
        } else if err.is_timeout() {
            "request timed out"
        } else if err.is_connect() {
            "could not connect to API server"
        } else if err.is_status() {
            "HTTP error status"
        } else if err.is_body() || err.is_decode() {
            "could not read response body"
        } else {
            "request failed"
        };

        let message = match err.url() {
            Some(url) => format!("{kind} ({})", url.path()),
            None => kind.to_string(),
        };

        Self::ServerResponse {
            message,
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_conversion() {
        let err: FetchError = ApiError {
            error_code: 5,
            error_msg: "User authorization failed".to_string(),
        }
        .into();

        assert!(err.is_api_parameter());
        assert_eq!(
            err.to_string(),
            "Could not properly request API. Status code: 5; Error: User authorization failed"
        );
    }

    #[test]
    fn test_bad_status_message() {
        let err = FetchError::bad_status(503, "Service Unavailable");
        assert!(err.is_server_response());
        assert!(err.to_string().contains("Status code: 503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }
}
