// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # VK Friends Core
//!
//! Core types shared by all `vk-friends` crates.
//!
//! This crate holds no network or file I/O. It provides:
//!
//! - Run configuration ([`FetchConfig`], built through [`FetchConfigBuilder`])
//! - One API response per page ([`PageResult`]) and the records it carries
//! - The API error payload ([`ApiError`])
//! - Supported report formats ([`ReportFormat`])
//! - Error types ([`CoreError`])

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Configuration
    FetchConfig,
    FetchConfigBuilder,
    DEFAULT_API_URL,
    DEFAULT_API_VERSION,
    DEFAULT_COUNT,
    DEFAULT_FIELDS,
    DEFAULT_REQUEST_TIMEOUT,
    // Pages and records
    ApiError,
    PageResult,
    Record,
    // Formats
    ReportFormat,
};
