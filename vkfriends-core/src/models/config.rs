//! Run configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// Default VK API base URL.
pub const DEFAULT_API_URL: &str = "https://api.vk.com";

/// Default VK API protocol version.
pub const DEFAULT_API_VERSION: &str = "5.131";

/// Default number of items requested per page.
pub const DEFAULT_COUNT: u32 = 100;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user fields requested from the API and written to reports.
pub const DEFAULT_FIELDS: &[&str] = &["first_name", "last_name", "country", "city", "bdate", "sex"];

/// Path of the friends method relative to the API base URL.
const FRIENDS_METHOD: &str = "method/friends.get";

// ============================================================================
// Fetch Config
// ============================================================================

/// Immutable configuration for one run.
///
/// Constructed once through [`FetchConfig::builder`] and only read afterwards.
/// When `limit` is smaller than the requested `count`, `count` is clamped
/// to `limit`.
#[derive(Clone)]
pub struct FetchConfig {
    auth_token: String,
    user_id: String,
    friends_endpoint: Url,
    api_version: String,
    fields: Vec<String>,
    count: u32,
    limit: Option<u32>,
    offset: u32,
    request_timeout: Duration,
}

impl FetchConfig {
    /// Starts a builder for the given credentials.
    pub fn builder(auth_token: impl Into<String>, user_id: impl Into<String>) -> FetchConfigBuilder {
        FetchConfigBuilder::new(auth_token, user_id)
    }

    /// Authentication token sent as a bearer credential.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Id of the user whose friends are fetched.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Full URL of the `friends.get` method.
    pub fn friends_endpoint(&self) -> &Url {
        &self.friends_endpoint
    }

    /// API protocol version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// User fields requested per record, in report column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Effective page size.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Total record cap, `None` when unbounded.
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Number of records skipped at the start of the friend list.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("auth_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("friends_endpoint", &self.friends_endpoint.as_str())
            .field("api_version", &self.api_version)
            .field("fields", &self.fields)
            .field("count", &self.count)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`FetchConfig`].
#[derive(Debug, Clone)]
pub struct FetchConfigBuilder {
    auth_token: String,
    user_id: String,
    api_url: String,
    api_version: String,
    fields: Vec<String>,
    count: u32,
    limit: Option<u32>,
    offset: u32,
    request_timeout: Duration,
}

impl FetchConfigBuilder {
    /// Creates a builder with default settings.
    pub fn new(auth_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            user_id: user_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            fields: DEFAULT_FIELDS.iter().map(ToString::to_string).collect(),
            count: DEFAULT_COUNT,
            limit: None,
            offset: 0,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the API base URL.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the API protocol version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the requested user fields.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the page size.
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the total record cap.
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the initial skip.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the settings and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `count` is zero, the timeout
    /// is zero, the field list is empty, or the base URL cannot be parsed.
    pub fn build(self) -> Result<FetchConfig, CoreError> {
        if self.count == 0 {
            return Err(CoreError::InvalidConfig(
                "count must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        if self.fields.is_empty() {
            return Err(CoreError::InvalidConfig(
                "at least one field must be requested".to_string(),
            ));
        }

        let mut api_url = Url::parse(&self.api_url)
            .map_err(|e| CoreError::InvalidConfig(format!("invalid API URL {}: {e}", self.api_url)))?;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        let friends_endpoint = api_url
            .join(FRIENDS_METHOD)
            .map_err(|e| CoreError::InvalidConfig(format!("invalid API URL {api_url}: {e}")))?;

        // A zero limit means "no limit"
        let limit = self.limit.filter(|limit| *limit > 0);
        let count = match limit {
            Some(limit) if limit < self.count => limit,
            _ => self.count,
        };

        Ok(FetchConfig {
            auth_token: self.auth_token,
            user_id: self.user_id,
            friends_endpoint,
            api_version: self.api_version,
            fields: self.fields,
            count,
            limit,
            offset: self.offset,
            request_timeout: self.request_timeout,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::builder("token", "42").build().unwrap();

        assert_eq!(config.auth_token(), "token");
        assert_eq!(config.user_id(), "42");
        assert_eq!(config.api_version(), "5.131");
        assert_eq!(config.count(), 100);
        assert_eq!(config.limit(), None);
        assert_eq!(config.offset(), 0);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.fields(),
            ["first_name", "last_name", "country", "city", "bdate", "sex"]
        );
        assert_eq!(
            config.friends_endpoint().as_str(),
            "https://api.vk.com/method/friends.get"
        );
    }

    #[test]
    fn test_count_clamped_to_smaller_limit() {
        let config = FetchConfig::builder("t", "u")
            .count(100)
            .limit(Some(7))
            .build()
            .unwrap();

        assert_eq!(config.count(), 7);
        assert_eq!(config.limit(), Some(7));
    }

    #[test]
    fn test_count_kept_when_limit_larger() {
        let config = FetchConfig::builder("t", "u")
            .count(10)
            .limit(Some(25))
            .build()
            .unwrap();

        assert_eq!(config.count(), 10);
        assert_eq!(config.limit(), Some(25));
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let config = FetchConfig::builder("t", "u").limit(Some(0)).build().unwrap();
        assert_eq!(config.limit(), None);
        assert_eq!(config.count(), DEFAULT_COUNT);
    }

    #[test]
    fn test_zero_count_rejected() {
        let result = FetchConfig::builder("t", "u").count(0).build();
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = FetchConfig::builder("t", "u")
            .request_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let result = FetchConfig::builder("t", "u")
            .fields(Vec::<String>::new())
            .build();
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = FetchConfig::builder("t", "u").api_url("not a url").build();
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = FetchConfig::builder("t", "u")
            .api_url("http://127.0.0.1:8080/proxy")
            .build()
            .unwrap();

        assert_eq!(
            config.friends_endpoint().as_str(),
            "http://127.0.0.1:8080/proxy/method/friends.get"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = FetchConfig::builder("secret-token", "u").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
