//! Handlers for the `/videos` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vidcat_core::error::CoreError;
use vidcat_core::pagination::VideoPage;
use vidcat_core::video::{CreateVideoRequest, UpdateVideoRequest, VideoRecord};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::VideoListParams;
use crate::state::AppState;

/// Confirmation body for a delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/videos
///
/// Public listing with optional filters and pagination. Malformed filter or
/// paging values are ignored rather than rejected.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<VideoListParams>,
) -> AppResult<Json<VideoPage>> {
    let filter = params.filter();
    let window = params.window(state.config.page_limit_max);
    let page = state.catalog.list(&filter, window).await?;
    Ok(Json(page))
}

/// GET /api/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<VideoRecord>> {
    let video = state.catalog.get(&id).await?;
    Ok(Json(video))
}

/// POST /api/videos
///
/// The authenticated user becomes the owner of the new record.
pub async fn create_video(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateVideoRequest>,
) -> AppResult<(StatusCode, Json<VideoRecord>)> {
    let input = input.into_new_video()?;
    let video = state.catalog.create(auth.user_id, &input).await?;

    tracing::info!(video_id = %video.id, user_id = %auth.user_id, "Video created");

    Ok((StatusCode::CREATED, Json(video)))
}

/// PUT /api/videos/{id}
///
/// Partial update. Falsy fields leave the stored value unchanged.
pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateVideoRequest>,
) -> AppResult<Json<VideoRecord>> {
    let changes = input.into_changes();
    let video = state
        .catalog
        .update(auth.user_id, &id, &changes)
        .await
        .inspect_err(|err| log_denial(err, &id, &auth))?;

    tracing::info!(video_id = %video.id, user_id = %auth.user_id, "Video updated");

    Ok(Json(video))
}

/// DELETE /api/videos/{id}
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let video_id = state
        .catalog
        .delete(auth.user_id, &id)
        .await
        .inspect_err(|err| log_denial(err, &id, &auth))?;

    tracing::info!(video_id = %video_id, user_id = %auth.user_id, "Video removed");

    Ok(Json(MessageResponse {
        message: "Video removed",
    }))
}

fn log_denial(err: &CoreError, video_id: &str, auth: &AuthUser) {
    if let CoreError::Forbidden(reason) = err {
        tracing::warn!(video_id, user_id = %auth.user_id, reason, "Video mutation denied");
    }
}
