//! User accounts backing the bearer-token principal.

use serde::Serialize;

use crate::types::{Timestamp, UserId};

/// A registered user. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// Input for registering a user. `email` is expected lower-cased and the
/// password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
