// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # VK Friends Fetch
//!
//! Fetching of a user's friend list from the VK API, one bounded page at a
//! time.
//!
//! ## Page Fetcher
//!
//! - [`client::PageFetcher`] - Trait for anything that can fetch one page
//! - [`client::FriendsApiClient`] - `friends.get` over HTTP
//!
//! ## Pagination Driver
//!
//! - [`pagination::PageWindow`] - Offset/count of one request
//! - [`pagination::FriendPages`] - Lazy, ordered, non-restartable page sequence
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use vkfriends_core::FetchConfig;
//! use vkfriends_fetch::{FriendPages, FriendsApiClient};
//!
//! let config = FetchConfig::builder(token, "1").build()?;
//! let client = FriendsApiClient::new(&config)?;
//! let mut pages = FriendPages::new(client, &config);
//!
//! while let Some(page) = pages.next_page().await {
//!     println!("{:?}", page?.items());
//! }
//! ```

pub mod client;
pub mod error;
pub mod pagination;

// Re-export key types at crate root
pub use client::{FriendsApiClient, PageFetcher};
pub use error::FetchError;
pub use pagination::{FriendPages, PageWindow};
