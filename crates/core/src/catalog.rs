//! Video catalog service: the read path (filter + paginate) and the write
//! path (load, authorize, mutate, persist).
//!
//! Load and write are separate store calls and are not wrapped in a
//! transaction. A record deleted between the two is reported as not-found.

use std::sync::Arc;

use crate::access::{authorize, Mutation, OwnerlessPolicy};
use crate::error::CoreError;
use crate::filter::VideoFilter;
use crate::pagination::{PageWindow, VideoPage};
use crate::store::VideoStore;
use crate::types::{parse_id, UserId, VideoId};
use crate::video::{NewVideo, VideoChanges, VideoRecord};

const ENTITY: &str = "Video";

/// Entry point for every video operation. Cheap to clone.
#[derive(Clone)]
pub struct VideoCatalog {
    store: Arc<dyn VideoStore>,
    ownerless: OwnerlessPolicy,
}

impl VideoCatalog {
    pub fn new(store: Arc<dyn VideoStore>, ownerless: OwnerlessPolicy) -> Self {
        Self { store, ownerless }
    }

    pub fn ownerless_policy(&self) -> OwnerlessPolicy {
        self.ownerless
    }

    /// List records matching `filter` within `window`.
    pub async fn list(
        &self,
        filter: &VideoFilter,
        window: PageWindow,
    ) -> Result<VideoPage, CoreError> {
        let (videos, total) = self.store.find_videos(filter, window).await?;
        Ok(window.into_page(videos, total))
    }

    /// Fetch one record. A malformed id is reported exactly like a missing one.
    pub async fn get(&self, raw_id: &str) -> Result<VideoRecord, CoreError> {
        self.load(raw_id).await
    }

    /// Insert a record owned by `principal`.
    pub async fn create(
        &self,
        principal: UserId,
        input: &NewVideo,
    ) -> Result<VideoRecord, CoreError> {
        Ok(self.store.insert_video(input, principal).await?)
    }

    /// Apply `changes` to an existing record. `created_by` and `created_at`
    /// are never written.
    pub async fn update(
        &self,
        principal: UserId,
        raw_id: &str,
        changes: &VideoChanges,
    ) -> Result<VideoRecord, CoreError> {
        let existing = self.load(raw_id).await?;
        authorize(principal, &existing, Mutation::Update, self.ownerless)?;

        if changes.is_empty() {
            return Ok(existing);
        }

        self.store
            .update_video(existing.id, changes)
            .await?
            .ok_or_else(|| not_found(existing.id))
    }

    /// Remove an existing record.
    pub async fn delete(&self, principal: UserId, raw_id: &str) -> Result<VideoId, CoreError> {
        let existing = self.load(raw_id).await?;
        authorize(principal, &existing, Mutation::Delete, self.ownerless)?;

        if self.store.delete_video(existing.id).await? {
            Ok(existing.id)
        } else {
            Err(not_found(existing.id))
        }
    }

    async fn load(&self, raw_id: &str) -> Result<VideoRecord, CoreError> {
        let id = parse_id(raw_id).ok_or_else(|| CoreError::NotFound {
            entity: ENTITY,
            id: raw_id.to_string(),
        })?;
        self.store.find_video(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: VideoId) -> CoreError {
    CoreError::NotFound {
        entity: ENTITY,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use crate::filter::VideoFilterParams;
    use crate::store::memory::InMemoryStore;

    fn sample(title: &str, rating: i32) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            video_url: "http://x.test/v".to_string(),
            performers: vec!["Ann".to_string()],
            genres: vec!["Drama".to_string()],
            rating,
            site: "s1".to_string(),
        }
    }

    fn catalog_with(store: Arc<InMemoryStore>, policy: OwnerlessPolicy) -> VideoCatalog {
        VideoCatalog::new(store, policy)
    }

    fn catalog() -> (VideoCatalog, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (catalog_with(store.clone(), OwnerlessPolicy::Open), store)
    }

    #[tokio::test]
    async fn create_then_get_round_trips_the_fields() {
        let (catalog, _) = catalog();
        let owner = Uuid::now_v7();
        let input = sample("A", 4);

        let created = catalog.create(owner, &input).await.unwrap();
        let fetched = catalog.get(&created.id.to_string()).await.unwrap();

        assert_eq!(fetched.title, input.title);
        assert_eq!(fetched.video_url, input.video_url);
        assert_eq!(fetched.performers, input.performers);
        assert_eq!(fetched.genres, input.genres);
        assert_eq!(fetched.rating, input.rating);
        assert_eq!(fetched.site, input.site);
        assert_eq!(fetched.owner_id(), Some(owner));
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn malformed_and_unknown_ids_are_not_found() {
        let (catalog, _) = catalog();
        assert_matches!(
            catalog.get("definitely-not-an-id").await,
            Err(CoreError::NotFound { entity: "Video", .. })
        );
        assert_matches!(
            catalog.get(&Uuid::now_v7().to_string()).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn partial_update_replaces_only_supplied_fields() {
        let (catalog, _) = catalog();
        let owner = Uuid::now_v7();
        let created = catalog.create(owner, &sample("A", 4)).await.unwrap();

        let changes = VideoChanges {
            rating: Some(5),
            genres: Some(vec!["Noir".to_string()]),
            ..Default::default()
        };
        let updated = catalog
            .update(owner, &created.id.to_string(), &changes)
            .await
            .unwrap();

        assert_eq!(updated.rating, 5);
        assert_eq!(updated.genres, vec!["Noir"]);
        assert_eq!(updated.title, "A");
        assert_eq!(updated.performers, created.performers);
        assert_eq!(updated.created_by, created.created_by);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn empty_update_returns_the_record_unchanged() {
        let (catalog, _) = catalog();
        let owner = Uuid::now_v7();
        let created = catalog.create(owner, &sample("A", 4)).await.unwrap();
        let updated = catalog
            .update(owner, &created.id.to_string(), &VideoChanges::default())
            .await
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_and_record_is_untouched() {
        let (catalog, store) = catalog();
        let owner = Uuid::now_v7();
        let other = Uuid::now_v7();
        let created = catalog.create(owner, &sample("A", 4)).await.unwrap();
        let id = created.id.to_string();

        let changes = VideoChanges {
            rating: Some(5),
            ..Default::default()
        };
        assert_matches!(
            catalog.update(other, &id, &changes).await,
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(catalog.delete(other, &id).await, Err(CoreError::Forbidden(_)));

        assert_eq!(catalog.get(&id).await.unwrap().rating, 4);
        assert_eq!(store.video_count().await, 1);
    }

    #[tokio::test]
    async fn missing_record_is_not_found_before_authorization() {
        let (catalog, _) = catalog();
        let id = Uuid::now_v7().to_string();
        assert_matches!(
            catalog.delete(Uuid::now_v7(), &id).await,
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(
            catalog
                .update(Uuid::now_v7(), "bogus", &VideoChanges::default())
                .await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let (catalog, store) = catalog();
        let owner = Uuid::now_v7();
        let created = catalog.create(owner, &sample("A", 4)).await.unwrap();
        let removed = catalog
            .delete(owner, &created.id.to_string())
            .await
            .unwrap();
        assert_eq!(removed, created.id);
        assert_eq!(store.video_count().await, 0);
    }

    #[tokio::test]
    async fn ownerless_records_are_open_by_default() {
        let (catalog, store) = catalog();
        let legacy = store.insert_legacy_video(&sample("Legacy", 2), None).await;
        let anyone = Uuid::now_v7();

        let changes = VideoChanges {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = catalog
            .update(anyone, &legacy.id.to_string(), &changes)
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.created_by, None);

        catalog
            .delete(anyone, &legacy.id.to_string())
            .await
            .unwrap();
        assert_eq!(store.video_count().await, 0);
    }

    #[tokio::test]
    async fn locked_policy_protects_ownerless_records() {
        let store = Arc::new(InMemoryStore::new());
        let catalog = catalog_with(store.clone(), OwnerlessPolicy::Locked);
        let legacy = store.insert_legacy_video(&sample("Legacy", 2), None).await;

        assert_matches!(
            catalog
                .delete(Uuid::now_v7(), &legacy.id.to_string())
                .await,
            Err(CoreError::Forbidden(_))
        );
    }

    #[tokio::test]
    async fn second_page_of_twelve() {
        let (catalog, _) = catalog();
        let owner = Uuid::now_v7();
        for i in 1..=12 {
            catalog
                .create(owner, &sample(&format!("v{i:02}"), 3))
                .await
                .unwrap();
        }

        let page = catalog
            .list(&VideoFilter::default(), PageWindow::new(2, 5))
            .await
            .unwrap();

        assert_eq!(page.total_videos, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        let titles: Vec<&str> = page.videos.iter().map(|v| v.title.as_str()).collect();
        // Newest first: v12..v08 on page 1, v07..v03 on page 2.
        assert_eq!(titles, vec!["v07", "v06", "v05", "v04", "v03"]);
    }

    #[tokio::test]
    async fn rating_filter_and_ignored_rating() {
        let (catalog, _) = catalog();
        let owner = Uuid::now_v7();
        for rating in 1..=5 {
            catalog
                .create(owner, &sample(&format!("r{rating}"), rating))
                .await
                .unwrap();
        }

        let at_least_three = VideoFilter::from_params(&VideoFilterParams {
            rating: Some("3".into()),
            ..Default::default()
        });
        let page = catalog
            .list(&at_least_three, PageWindow::default())
            .await
            .unwrap();
        assert_eq!(page.total_videos, 3);
        assert!(page.videos.iter().all(|v| v.rating >= 3));

        let ignored = VideoFilter::from_params(&VideoFilterParams {
            rating: Some("abc".into()),
            ..Default::default()
        });
        let unfiltered = catalog
            .list(&VideoFilter::default(), PageWindow::default())
            .await
            .unwrap();
        let with_bad_rating = catalog.list(&ignored, PageWindow::default()).await.unwrap();
        assert_eq!(with_bad_rating, unfiltered);
    }
}
