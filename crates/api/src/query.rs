//! Query-string parameter types for the video listing.

use serde::Deserialize;
use vidcat_core::filter::{VideoFilter, VideoFilterParams};
use vidcat_core::pagination::PageWindow;

/// `?title=&actress=&genre=&rating=&page=&limit=`
///
/// Every value is taken as a raw string; the core decides what is usable and
/// ignores the rest.
#[derive(Debug, Default, Deserialize)]
pub struct VideoListParams {
    pub title: Option<String>,
    pub actress: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl VideoListParams {
    pub fn filter(&self) -> VideoFilter {
        VideoFilter::from_params(&VideoFilterParams {
            title: self.title.clone(),
            actress: self.actress.clone(),
            genre: self.genre.clone(),
            rating: self.rating.clone(),
        })
    }

    pub fn window(&self, max_limit: Option<u64>) -> PageWindow {
        PageWindow::from_params(self.page.as_deref(), self.limit.as_deref(), max_limit)
    }
}
