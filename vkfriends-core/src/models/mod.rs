//! Domain models for `vk-friends`.

mod config;
mod format;
mod page;

pub use config::{
    FetchConfig, FetchConfigBuilder, DEFAULT_API_URL, DEFAULT_API_VERSION, DEFAULT_COUNT,
    DEFAULT_FIELDS, DEFAULT_REQUEST_TIMEOUT,
};
pub use format::ReportFormat;
pub use page::{ApiError, PageResult, Record};
