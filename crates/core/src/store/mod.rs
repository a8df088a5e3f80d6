//! Persistence seams.
//!
//! The catalog depends only on these traits. The Postgres implementation
//! lives in the `db` crate; [`memory::InMemoryStore`] backs local development
//! and tests.

pub mod memory;

use async_trait::async_trait;

use crate::filter::VideoFilter;
use crate::pagination::PageWindow;
use crate::types::{UserId, VideoId};
use crate::user::{NewUser, User};
use crate::video::{NewVideo, VideoChanges, VideoRecord};

/// Failures surfaced by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated. Carries the constraint name.
    #[error("duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    /// Any other backend failure.
    #[error("store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn find_video(&self, id: VideoId) -> StoreResult<Option<VideoRecord>>;

    /// Return the records inside `window` (ordered by `created_at` descending,
    /// ties newest-first) together with the total number of matches.
    async fn find_videos(
        &self,
        filter: &VideoFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<VideoRecord>, u64)>;

    /// Insert a record owned by `owner`. The store assigns `id` and `created_at`.
    async fn insert_video(&self, input: &NewVideo, owner: UserId) -> StoreResult<VideoRecord>;

    /// Write the `Some` fields of `changes`. Returns `None` if the row no
    /// longer exists.
    async fn update_video(
        &self,
        id: VideoId,
        changes: &VideoChanges,
    ) -> StoreResult<Option<VideoRecord>>;

    /// Returns `true` if a row was removed.
    async fn delete_video(&self, id: VideoId) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, input: &NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}
