//! Pagination driver for the friend list.
//!
//! [`FriendPages`] walks the remote collection in bounded pages. Each page
//! covers the window `[offset + p·count, offset + p·count + count)`; with a
//! `limit` set, the window that reaches the cap is shrunk to the remaining
//! quota and marked final before it is requested.
//!
//! The sequence ends when:
//! - a page arrives with an empty item list (that page is not emitted)
//! - the final page under `limit` has been emitted
//! - a page arrives without the success shape (emitted once so the consumer
//!   can inspect the error payload)
//! - a request fails (the error is emitted)

use futures::Stream;
use tracing::{debug, info};
use vkfriends_core::{FetchConfig, PageResult};

use crate::client::PageFetcher;
use crate::error::FetchError;

// ============================================================================
// Page Window
// ============================================================================

/// The slice of the friend list requested by one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Absolute offset sent to the API.
    pub offset: u64,
    /// Number of items requested.
    pub count: u32,
    /// True if no page follows this one.
    pub is_last: bool,
}

impl PageWindow {
    /// Computes the window for zero-based page `page`.
    ///
    /// `offset` is added once as a constant shift; it does not count against
    /// `limit`.
    pub fn compute(page: u32, count: u32, limit: Option<u32>, offset: u32) -> Self {
        let left = u64::from(page) * u64::from(count);
        let right = left + u64::from(count);

        let (count, is_last) = match limit.map(u64::from) {
            Some(limit) if right >= limit => {
                // Remaining quota always fits in u32 because it is below `count`.
                let remaining = u32::try_from(limit.saturating_sub(left)).unwrap_or(count);
                (remaining, true)
            }
            _ => (count, false),
        };

        Self {
            offset: u64::from(offset) + left,
            count,
            is_last,
        }
    }
}

// ============================================================================
// Friend Pages
// ============================================================================

/// Lazy, finite, non-restartable sequence of friend list pages.
///
/// Nothing is requested until [`FriendPages::next_page`] is awaited (or the
/// stream from [`FriendPages::into_stream`] is polled); each call issues at
/// most one request.
#[derive(Debug)]
pub struct FriendPages<F> {
    fetcher: F,
    count: u32,
    limit: Option<u32>,
    offset: u32,
    page: u32,
    finished: bool,
}

impl<F: PageFetcher> FriendPages<F> {
    /// Creates the sequence for the given configuration.
    pub fn new(fetcher: F, config: &FetchConfig) -> Self {
        Self {
            fetcher,
            count: config.count(),
            limit: config.limit(),
            offset: config.offset(),
            page: 0,
            finished: false,
        }
    }

    /// Returns the window the next request will use.
    pub fn current_window(&self) -> PageWindow {
        PageWindow::compute(self.page, self.count, self.limit, self.offset)
    }

    /// Returns true once the sequence has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetches the next page, or returns `None` once the sequence has ended.
    ///
    /// A failed request is returned as `Some(Err(_))` and ends the sequence.
    pub async fn next_page(&mut self) -> Option<Result<PageResult, FetchError>> {
        if self.finished {
            return None;
        }

        let window = self.current_window();
        debug!(page = self.page, offset = window.offset, count = window.count, "Fetching page");

        let page = match self.fetcher.fetch_page(window).await {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        match page.items().map(<[_]>::len) {
            None => {
                debug!(status = page.status_code, "No success shape in response, stopping");
                self.finished = true;
                Some(Ok(page))
            }
            Some(0) => {
                debug!(page = self.page, "Empty page, end of friend list");
                self.finished = true;
                None
            }
            Some(items) => {
                self.log_progress(&page, window, items);
                if window.is_last {
                    self.finished = true;
                } else {
                    self.page += 1;
                }
                Some(Ok(page))
            }
        }
    }

    /// Converts the sequence into a stream of pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<PageResult, FetchError>> {
        futures::stream::unfold(self, |mut pages| async move {
            let item = pages.next_page().await?;
            Some((item, pages))
        })
    }

    fn log_progress(&self, page: &PageResult, window: PageWindow, items: usize) {
        let offset = u64::from(self.offset);
        let right = window.offset + u64::from(window.count) - offset;

        match page.total_count() {
            Some(total) => {
                let fetched = total.saturating_sub(offset).min(right);
                info!("Fetched {fetched} out of {total} friends...");
            }
            None => info!(items, "Fetched page {}", self.page + 1),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
