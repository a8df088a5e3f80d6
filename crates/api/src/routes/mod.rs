pub mod auth;
pub mod health;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/signup          register (public)
/// /auth/login           login (public)
///
/// /videos               list (public), create (auth)
/// /videos/{id}          get (public), update, delete (auth, owner only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/videos", videos::router())
}
