//! Page/limit handling for the video listing.
//!
//! Parameters arrive as raw strings and are parsed permissively: anything
//! that is not a positive integer falls back to the default.

use serde::Serialize;

use crate::video::VideoRecord;

/// Page used when `page` is absent or malformed.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when `limit` is absent or malformed.
pub const DEFAULT_LIMIT: u64 = 10;

/// A scan window over records ordered by `created_at` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u64,
    limit: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Build a window from already-parsed values. Zeros are raised to 1.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Build a window from raw query-string values.
    ///
    /// When `max_limit` is set, larger limits are clamped down to it.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, max_limit: Option<u64>) -> Self {
        let page = page.and_then(parse_positive).unwrap_or(DEFAULT_PAGE);
        let limit = limit.and_then(parse_positive).unwrap_or(DEFAULT_LIMIT);
        let limit = match max_limit {
            Some(max) => limit.min(max.max(1)),
            None => limit,
        };
        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    /// Assemble the listing response for this window.
    pub fn into_page(self, videos: Vec<VideoRecord>, total: u64) -> VideoPage {
        VideoPage {
            videos,
            total_pages: self.total_pages(total),
            current_page: self.page,
            total_videos: total,
        }
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Response body for `GET /videos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPage {
    pub videos: Vec<VideoRecord>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total_videos: u64,
}
