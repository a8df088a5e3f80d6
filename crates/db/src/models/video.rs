//! Row type for the `videos` table joined with its owner.

use sqlx::FromRow;
use vidcat_core::types::{Timestamp, UserId, VideoId};
use vidcat_core::video::{Owner, VideoRecord};

/// A `videos` row with the owner's username resolved through a left join.
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: VideoId,
    pub title: String,
    pub video_url: String,
    pub performers: Vec<String>,
    pub genres: Vec<String>,
    pub rating: i32,
    pub site: String,
    pub created_by: Option<UserId>,
    /// `NULL` when the record has no owner or the owner row is gone.
    pub created_by_username: Option<String>,
    pub created_at: Timestamp,
}

impl From<VideoRow> for VideoRecord {
    fn from(row: VideoRow) -> Self {
        let username = row.created_by_username;
        Self {
            id: row.id,
            title: row.title,
            video_url: row.video_url,
            performers: row.performers,
            genres: row.genres,
            rating: row.rating,
            site: row.site,
            created_by: row.created_by.map(|id| Owner { id, username }),
            created_at: row.created_at,
        }
    }
}
