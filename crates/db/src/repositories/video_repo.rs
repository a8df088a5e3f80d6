//! Repository for the `videos` table.
//!
//! Every read joins `users` so the owner's username comes back with the row.
//! Inserts and updates use a data-modifying CTE for the same reason.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidcat_core::filter::VideoFilter;
use vidcat_core::pagination::PageWindow;
use vidcat_core::types::{UserId, VideoId};
use vidcat_core::video::{NewVideo, VideoChanges};

use crate::models::video::VideoRow;

/// Column list shared across queries. Expects `videos v` and `users u`.
const COLUMNS: &str = "v.id, v.title, v.video_url, v.performers, v.genres, v.rating, v.site, \
                       v.created_by, u.username AS created_by_username, v.created_at";

const OWNER_JOIN: &str = "LEFT JOIN users u ON u.id = v.created_by";

/// Provides CRUD and filtered listing for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewVideo,
        owner: Option<UserId>,
    ) -> Result<VideoRow, sqlx::Error> {
        let query = format!(
            "WITH v AS (
                INSERT INTO videos (id, title, video_url, performers, genres, rating, site, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT {COLUMNS} FROM v {OWNER_JOIN}"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.title)
            .bind(&input.video_url)
            .bind(&input.performers)
            .bind(&input.genres)
            .bind(input.rating)
            .bind(&input.site)
            .bind(owner)
            .fetch_one(pool)
            .await
    }

    /// Find a video by ID.
    pub async fn find_by_id(pool: &PgPool, id: VideoId) -> Result<Option<VideoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos v {OWNER_JOIN} WHERE v.id = $1");
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the videos matching `filter` inside `window`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &VideoFilter,
        window: PageWindow,
    ) -> Result<Vec<VideoRow>, sqlx::Error> {
        let query = list_query(filter);
        bind_filter(sqlx::query_as::<_, VideoRow>(&query), filter)
            .bind(to_i64(window.limit()))
            .bind(to_i64(window.offset()))
            .fetch_all(pool)
            .await
    }

    /// Count every video matching `filter`, ignoring pagination.
    pub async fn count(pool: &PgPool, filter: &VideoFilter) -> Result<i64, sqlx::Error> {
        let query = count_query(filter);
        let (total,) = bind_filter(sqlx::query_as::<_, (i64,)>(&query), filter)
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Update a video. Only `Some` fields in `changes` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: VideoId,
        changes: &VideoChanges,
    ) -> Result<Option<VideoRow>, sqlx::Error> {
        let query = format!(
            "WITH v AS (
                UPDATE videos SET
                    title = COALESCE($2, title),
                    video_url = COALESCE($3, video_url),
                    performers = COALESCE($4, performers),
                    genres = COALESCE($5, genres),
                    rating = COALESCE($6, rating),
                    site = COALESCE($7, site)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM v {OWNER_JOIN}"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .bind(changes.title.as_deref())
            .bind(changes.video_url.as_deref())
            .bind(changes.performers.as_deref())
            .bind(changes.genres.as_deref())
            .bind(changes.rating)
            .bind(changes.site.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a video by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: VideoId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Dynamic filter SQL
// ---------------------------------------------------------------------------

/// Build the `WHERE` clause for `filter`, numbering placeholders from `$1`.
///
/// Returns the clause (empty when unconstrained) and the next free
/// placeholder index. [`bind_filter`] binds values in the same order.
fn where_clause(filter: &VideoFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.title().is_some() {
        conditions.push(format!("v.title ILIKE ${bind_idx}"));
        bind_idx += 1;
    }
    if !filter.performers().is_empty() {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM unnest(v.performers) AS p(name) WHERE p.name ILIKE ANY(${bind_idx}))"
        ));
        bind_idx += 1;
    }
    if !filter.genres().is_empty() {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM unnest(v.genres) AS g(name) WHERE g.name ILIKE ANY(${bind_idx}))"
        ));
        bind_idx += 1;
    }
    if filter.min_rating().is_some() {
        conditions.push(format!("v.rating >= ${bind_idx}"));
        bind_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, bind_idx)
}

fn list_query(filter: &VideoFilter) -> String {
    let (where_clause, bind_idx) = where_clause(filter);
    format!(
        "SELECT {COLUMNS} FROM videos v {OWNER_JOIN} {where_clause} \
         ORDER BY v.created_at DESC, v.id DESC \
         LIMIT ${bind_idx} OFFSET ${next_idx}",
        next_idx = bind_idx + 1,
    )
}

fn count_query(filter: &VideoFilter) -> String {
    let (where_clause, _) = where_clause(filter);
    format!("SELECT COUNT(*) FROM videos v {where_clause}")
}

/// Bind the filter values in the order [`where_clause`] numbered them.
fn bind_filter<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &VideoFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    if let Some(title) = filter.title() {
        query = query.bind(title.like_pattern());
    }
    if !filter.performers().is_empty() {
        query = query.bind(patterns(filter.performers()));
    }
    if !filter.genres().is_empty() {
        query = query.bind(patterns(filter.genres()));
    }
    if let Some(min) = filter.min_rating() {
        query = query.bind(min);
    }
    query
}

fn patterns(needles: &[vidcat_core::filter::Needle]) -> Vec<String> {
    needles.iter().map(|n| n.like_pattern()).collect()
}

/// Postgres has no unsigned integers; saturate instead of wrapping.
fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
