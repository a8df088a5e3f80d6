//! [`VideoStore`] and [`UserStore`] backed by Postgres.

use async_trait::async_trait;
use vidcat_core::filter::VideoFilter;
use vidcat_core::pagination::PageWindow;
use vidcat_core::store::{StoreError, StoreResult, UserStore, VideoStore};
use vidcat_core::types::{UserId, VideoId};
use vidcat_core::user::{NewUser, User};
use vidcat_core::video::{NewVideo, VideoChanges, VideoRecord};

use crate::repositories::{UserRepo, VideoRepo};
use crate::DbPool;

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Translate a driver error into the store's error vocabulary.
fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return StoreError::Duplicate(constraint);
        }
    }
    StoreError::Backend(Box::new(err))
}

#[async_trait]
impl VideoStore for PgStore {
    async fn find_video(&self, id: VideoId) -> StoreResult<Option<VideoRecord>> {
        let row = VideoRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(VideoRecord::from))
    }

    async fn find_videos(
        &self,
        filter: &VideoFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<VideoRecord>, u64)> {
        let rows = VideoRepo::list(&self.pool, filter, window)
            .await
            .map_err(store_error)?;
        let total = VideoRepo::count(&self.pool, filter)
            .await
            .map_err(store_error)?;
        let videos = rows.into_iter().map(VideoRecord::from).collect();
        Ok((videos, u64::try_from(total).unwrap_or_default()))
    }

    async fn insert_video(&self, input: &NewVideo, owner: UserId) -> StoreResult<VideoRecord> {
        let row = VideoRepo::create(&self.pool, input, Some(owner))
            .await
            .map_err(store_error)?;
        tracing::debug!(video_id = %row.id, "Inserted video row");
        Ok(row.into())
    }

    async fn update_video(
        &self,
        id: VideoId,
        changes: &VideoChanges,
    ) -> StoreResult<Option<VideoRecord>> {
        let row = VideoRepo::update(&self.pool, id, changes)
            .await
            .map_err(store_error)?;
        Ok(row.map(VideoRecord::from))
    }

    async fn delete_video(&self, id: VideoId) -> StoreResult<bool> {
        VideoRepo::delete(&self.pool, id).await.map_err(store_error)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, input: &NewUser) -> StoreResult<User> {
        let row = UserRepo::create(&self.pool, input)
            .await
            .map_err(store_error)?;
        Ok(row.into())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(store_error)?;
        Ok(row.map(User::from))
    }
}
