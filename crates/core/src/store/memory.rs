//! In-process store with the same filter, ordering, and window semantics as
//! the Postgres backend.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, UserStore, VideoStore};
use crate::filter::VideoFilter;
use crate::pagination::PageWindow;
use crate::types::{UserId, VideoId};
use crate::user::{NewUser, User};
use crate::video::{NewVideo, Owner, VideoChanges, VideoRecord};

#[derive(Debug, Default)]
struct Tables {
    /// Insertion order. Owner usernames are not stored; they are resolved on
    /// read like the Postgres join does.
    videos: Vec<VideoRecord>,
    users: Vec<User>,
}

impl Tables {
    fn resolve(&self, stored: &VideoRecord) -> VideoRecord {
        let mut record = stored.clone();
        if let Some(owner) = record.created_by.as_mut() {
            owner.username = self
                .users
                .iter()
                .find(|u| u.id == owner.id)
                .map(|u| u.username.clone());
        }
        record
    }

    fn insert(&mut self, input: &NewVideo, owner: Option<UserId>) -> VideoRecord {
        let stored = VideoRecord {
            id: Uuid::now_v7(),
            title: input.title.clone(),
            video_url: input.video_url.clone(),
            performers: input.performers.clone(),
            genres: input.genres.clone(),
            rating: input.rating,
            site: input.site.clone(),
            created_by: owner.map(|id| Owner { id, username: None }),
            created_at: Utc::now(),
        };
        let record = self.resolve(&stored);
        self.videos.push(stored);
        record
    }
}

/// A [`VideoStore`] + [`UserStore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record with an explicit (possibly absent) owner. Used to seed
    /// legacy owner-less records.
    pub async fn insert_legacy_video(
        &self,
        input: &NewVideo,
        owner: Option<UserId>,
    ) -> VideoRecord {
        self.tables.write().await.insert(input, owner)
    }

    pub async fn video_count(&self) -> usize {
        self.tables.read().await.videos.len()
    }
}

#[async_trait]
impl VideoStore for InMemoryStore {
    async fn find_video(&self, id: VideoId) -> StoreResult<Option<VideoRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .videos
            .iter()
            .find(|row| row.id == id)
            .map(|row| tables.resolve(row)))
    }

    async fn find_videos(
        &self,
        filter: &VideoFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<VideoRecord>, u64)> {
        let tables = self.tables.read().await;

        // Newest insertion first, then a stable sort keeps that as the tie-break.
        let mut matching: Vec<VideoRecord> = tables
            .videos
            .iter()
            .rev()
            .map(|row| tables.resolve(row))
            .filter(|record| filter.matches(record))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let skip = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(window.limit()).unwrap_or(usize::MAX);
        let page = matching.into_iter().skip(skip).take(take).collect();
        Ok((page, total))
    }

    async fn insert_video(&self, input: &NewVideo, owner: UserId) -> StoreResult<VideoRecord> {
        Ok(self.tables.write().await.insert(input, Some(owner)))
    }

    async fn update_video(
        &self,
        id: VideoId,
        changes: &VideoChanges,
    ) -> StoreResult<Option<VideoRecord>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.videos.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        changes.apply_to(row);
        let row = row.clone();
        Ok(Some(tables.resolve(&row)))
    }

    async fn delete_video(&self, id: VideoId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.videos.len();
        tables.videos.retain(|row| row.id != id);
        Ok(tables.videos.len() < before)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, input: &NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == input.username) {
            return Err(StoreError::Duplicate("uq_users_username".into()));
        }
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(StoreError::Duplicate("uq_users_email".into()));
        }
        let user = User {
            id: Uuid::now_v7(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::filter::VideoFilterParams;

    fn new_video(title: &str) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            video_url: "http://x.test/v".to_string(),
            performers: vec!["Ann".to_string()],
            genres: vec!["Drama".to_string()],
            rating: 3,
            site: "s1".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_owner_and_timestamp() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        let record = store.insert_video(&new_video("A"), owner).await.unwrap();
        assert_eq!(record.owner_id(), Some(owner));
        let found = store.find_video(record.id).await.unwrap();
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn listing_is_newest_first_with_totals() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        for i in 1..=4 {
            store
                .insert_video(&new_video(&format!("v{i}")), owner)
                .await
                .unwrap();
        }
        let (page, total) = store
            .find_videos(&VideoFilter::default(), PageWindow::new(1, 3))
            .await
            .unwrap();
        assert_eq!(total, 4);
        let titles: Vec<&str> = page.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["v4", "v3", "v2"]);
    }

    #[tokio::test]
    async fn listing_applies_the_filter_before_counting() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        store.insert_video(&new_video("Sunrise"), owner).await.unwrap();
        store.insert_video(&new_video("Sunset"), owner).await.unwrap();
        store.insert_video(&new_video("Moon"), owner).await.unwrap();

        let filter = VideoFilter::from_params(&VideoFilterParams {
            title: Some("sun".into()),
            ..Default::default()
        });
        let (page, total) = store
            .find_videos(&filter, PageWindow::default())
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_row_returns_none() {
        let store = InMemoryStore::new();
        let changes = VideoChanges {
            rating: Some(5),
            ..Default::default()
        };
        assert_eq!(store.update_video(Uuid::now_v7(), &changes).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = InMemoryStore::new();
        let record = store
            .insert_video(&new_video("A"), Uuid::now_v7())
            .await
            .unwrap();
        assert!(store.delete_video(record.id).await.unwrap());
        assert!(!store.delete_video(record.id).await.unwrap());
        assert_eq!(store.video_count().await, 0);
    }

    #[tokio::test]
    async fn owner_username_is_resolved_on_read() {
        let store = InMemoryStore::new();
        let user = store
            .insert_user(&NewUser {
                username: "ann".into(),
                email: "ann@example.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        let record = store.insert_video(&new_video("A"), user.id).await.unwrap();
        let owner = record.created_by.expect("owned");
        assert_eq!(owner.username.as_deref(), Some("ann"));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        let input = NewUser {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password_hash: "hash".into(),
        };
        store.insert_user(&input).await.unwrap();
        let again = NewUser {
            username: "ann2".into(),
            email: "ANN@example.com".into(),
            ..input
        };
        assert_matches!(
            store.insert_user(&again).await,
            Err(StoreError::Duplicate(name)) if name == "uq_users_email"
        );
    }
}
