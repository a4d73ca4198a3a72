// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # VK Friends Report
//!
//! Writes a fetched friend list into a report file.
//!
//! ## Formats
//!
//! - [`delimited::DelimitedReport`] - CSV and TSV with a BOM and `#` preamble
//! - [`json::JsonReport`] - A single JSON document with a `friends` array
//!
//! ## Pipeline
//!
//! [`ReportGenerator`] is chosen once from a [`vkfriends_core::ReportFormat`]
//! and consumes the page stream produced by [`vkfriends_fetch::FriendPages`].
//! Every page is validated before its records are written; the first failure
//! aborts the run.
//!
//! [`VkFriends`] wires both halves together for a single run:
//!
//! ```ignore
//! use vkfriends_core::{FetchConfig, ReportFormat};
//! use vkfriends_report::VkFriends;
//!
//! let config = FetchConfig::builder(token, "1").build()?;
//! let summary = VkFriends::new(config, ReportFormat::Json, "./")
//!     .generate_report()
//!     .await?;
//! println!("{} friends written to {}", summary.records, summary.path.display());
//! ```

pub mod app;
pub mod delimited;
pub mod error;
pub mod fields;
pub mod generator;
pub mod json;
pub mod path;

// Re-export key types at crate root
pub use app::VkFriends;
pub use delimited::DelimitedReport;
pub use error::ReportError;
pub use fields::{PreparedItem, bdate_handler, handle_field};
pub use generator::{
    ReportContext, ReportDocument, ReportGenerator, ReportSummary, ReportTarget, validate_page,
};
pub use json::JsonReport;
pub use path::resolve_report_path;
