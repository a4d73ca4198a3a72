//! Page fetcher for the `friends.get` method.

use std::future::Future;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument};
use vkfriends_core::{FetchConfig, PageResult};

use crate::error::FetchError;
use crate::pagination::PageWindow;

/// User agent string for vk-friends.
const USER_AGENT: &str = concat!("vk-friends/", env!("CARGO_PKG_VERSION"));

/// Sort order requested from the API.
const ORDER: &str = "name";

// ============================================================================
// Page Fetcher
// ============================================================================

/// Anything that can fetch one page of the friend list.
///
/// Implementations perform exactly one attempt per call. Every failure is
/// reported as [`FetchError::ServerResponse`]; API error payloads are passed
/// through inside the returned [`PageResult`] unexamined.
pub trait PageFetcher {
    /// Fetches the page described by `window`.
    fn fetch_page(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = Result<PageResult, FetchError>> + Send;
}

impl<T: PageFetcher> PageFetcher for &T {
    fn fetch_page(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = Result<PageResult, FetchError>> + Send {
        (**self).fetch_page(window)
    }
}

// ============================================================================
// API Client
// ============================================================================

/// HTTP client for the VK `friends.get` method.
#[derive(Debug, Clone)]
pub struct FriendsApiClient {
    http: Client,
    endpoint: Url,
    auth_token: String,
    user_id: String,
    fields: String,
    api_version: String,
}

impl FriendsApiClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ServerResponse`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .connect_timeout(config.request_timeout())
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::ServerResponse {
                message: "could not build HTTP client".to_string(),
                source: Some(e),
            })?;

        Ok(Self {
            http,
            endpoint: config.friends_endpoint().clone(),
            auth_token: config.auth_token().to_string(),
            user_id: config.user_id().to_string(),
            fields: config.fields().join(","),
            api_version: config.api_version().to_string(),
        })
    }

    fn query(&self, window: PageWindow) -> [(&'static str, String); 6] {
        [
            ("offset", window.offset.to_string()),
            ("count", window.count.to_string()),
            ("order", ORDER.to_string()),
            ("user_id", self.user_id.clone()),
            ("fields", self.fields.clone()),
            ("v", self.api_version.clone()),
        ]
    }
}

impl PageFetcher for FriendsApiClient {
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    async fn fetch_page(&self, window: PageWindow) -> Result<PageResult, FetchError> {
        debug!("Requesting friends page");

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&self.query(window))
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), len = body.len(), "Response received");

        let payload = match serde_json::from_slice::<Value>(&body) {
            Ok(payload) => payload,
            Err(e) if status == StatusCode::OK => {
                return Err(FetchError::server_response(format!(
                    "malformed response body: {e}"
                )));
            }
            Err(_) => {
                debug!(status = status.as_u16(), "Non-JSON error body");
                Value::Null
            }
        };

        Ok(PageResult::new(status.as_u16(), reason, payload))
    }
}
