//! Repository for the `users` table.

use sqlx::PgPool;
use uuid::Uuid;
use vidcat_core::user::NewUser;

use crate::models::user::UserRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, created_at";

/// Provides the user lookups needed by signup and login.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique violation (`uq_users_username` / `uq_users_email`)
    /// when either value is already taken.
    pub async fn create(pool: &PgPool, input: &NewUser) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, username, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by email, ignoring case.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
