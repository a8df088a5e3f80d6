//! Video record model, request DTOs, and the normalization rules applied to
//! loosely-typed client input before it reaches the catalog.
//!
//! Normalization happens during deserialization so that validation only ever
//! sees canonical values:
//!
//! - `actress` / `genre` accept a string or an array of strings. A string
//!   becomes a one-element list; elements are trimmed; blank elements are
//!   dropped; order is preserved.
//! - Text fields are trimmed and a blank string is treated as absent.
//! - `rating` accepts a JSON integer or an integer-shaped string (`"4"`).
//!   On update, a rating of `0` is treated as absent.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{Timestamp, UserId, VideoId};

/// Accepted shape for `videoUrl`: optional http(s) scheme, a dotted host, and
/// an optional path made of URL-safe characters.
pub static URL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\w\-]+\.)+[\w\-]+(/[\w\-._~:/?#\[\]@!$&'()*+,;=%]*)?$")
        .expect("URL shape pattern is valid")
});

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// A persisted video record as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: VideoId,
    pub title: String,
    pub video_url: String,
    #[serde(rename = "actress")]
    pub performers: Vec<String>,
    #[serde(rename = "genre")]
    pub genres: Vec<String>,
    pub rating: i32,
    pub site: String,
    /// `None` for legacy records that were imported without an owner.
    pub created_by: Option<Owner>,
    pub created_at: Timestamp,
}

impl VideoRecord {
    /// The owning principal, if the record has one.
    pub fn owner_id(&self) -> Option<UserId> {
        self.created_by.as_ref().map(|owner| owner.id)
    }
}

/// Owner reference embedded in a [`VideoRecord`].
///
/// `username` is resolved at read time and is `None` when the owning user
/// row no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub id: UserId,
    pub username: Option<String>,
}

/// Fully validated input for inserting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub title: String,
    pub video_url: String,
    pub performers: Vec<String>,
    pub genres: Vec<String>,
    pub rating: i32,
    pub site: String,
}

/// Field replacements for an update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoChanges {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub performers: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub rating: Option<i32>,
    pub site: Option<String>,
}

impl VideoChanges {
    /// `true` when no field would be replaced.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.video_url.is_none()
            && self.performers.is_none()
            && self.genres.is_none()
            && self.rating.is_none()
            && self.site.is_none()
    }

    /// Apply the replacements to a record in place, leaving every other field
    /// (including `id`, `created_by`, `created_at`) untouched.
    pub fn apply_to(&self, video: &mut VideoRecord) {
        if let Some(title) = &self.title {
            video.title.clone_from(title);
        }
        if let Some(url) = &self.video_url {
            video.video_url.clone_from(url);
        }
        if let Some(performers) = &self.performers {
            video.performers.clone_from(performers);
        }
        if let Some(genres) = &self.genres {
            video.genres.clone_from(genres);
        }
        if let Some(rating) = self.rating {
            video.rating = rating;
        }
        if let Some(site) = &self.site {
            video.site.clone_from(site);
        }
    }
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /videos`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Valid video URL is required"),
        regex(path = *URL_SHAPE, message = "Valid video URL is required")
    )]
    pub video_url: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    #[validate(length(min = 1, message = "At least one actress is required"))]
    pub actress: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    #[validate(length(min = 1, message = "At least one genre is required"))]
    pub genre: Vec<String>,

    #[serde(default, deserialize_with = "integer_or_string")]
    #[validate(
        required(message = "Rating is required"),
        range(min = 1, max = 5, message = "Rating must be between 1 and 5")
    )]
    pub rating: Option<i32>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Site is required"))]
    pub site: Option<String>,
}

impl CreateVideoRequest {
    /// Convert a validated request into [`NewVideo`].
    ///
    /// Callers are expected to run [`Validate::validate`] first; a missing
    /// field here is reported as a validation failure rather than a panic.
    pub fn into_new_video(self) -> Result<NewVideo, CoreError> {
        let missing = |field: &str| CoreError::Validation(format!("{field} is required"));
        if self.actress.is_empty() {
            return Err(missing("actress"));
        }
        if self.genre.is_empty() {
            return Err(missing("genre"));
        }
        Ok(NewVideo {
            title: self.title.ok_or_else(|| missing("title"))?,
            video_url: self.video_url.ok_or_else(|| missing("videoUrl"))?,
            performers: self.actress,
            genres: self.genre,
            rating: self.rating.ok_or_else(|| missing("rating"))?,
            site: self.site.ok_or_else(|| missing("site"))?,
        })
    }
}

/// Request body for `PUT /videos/{id}`. Every field is optional; falsy values
/// (absent, `null`, blank, empty list, rating `0`) leave the stored value as is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(regex(path = *URL_SHAPE, message = "Video URL must be valid"))]
    pub video_url: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub actress: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub genre: Vec<String>,

    #[serde(default, deserialize_with = "zero_as_none")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub site: Option<String>,
}

impl UpdateVideoRequest {
    pub fn into_changes(self) -> VideoChanges {
        VideoChanges {
            title: self.title,
            video_url: self.video_url,
            performers: non_empty(self.actress),
            genres: non_empty(self.genre),
            rating: self.rating,
            site: self.site,
        }
    }
}

fn non_empty(tags: Vec<String>) -> Option<Vec<String>> {
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

// ---------------------------------------------------------------------------
// Normalizing deserializers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Trim every tag, drop blanks, keep order.
pub fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Deserialize a string-or-array field into a normalized tag list.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(OneOrMany::One(tag)) => normalize_tags([tag]),
        Some(OneOrMany::Many(tags)) => normalize_tags(tags),
    })
}

/// Deserialize an optional string, trimming it and mapping blanks to `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrString {
    Integer(i32),
    Text(String),
}

/// Deserialize an optional integer that may also arrive as a string.
/// A blank string is absent; any other non-integer string is an error.
fn integer_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntegerOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntegerOrString::Integer(value)) => Ok(Some(value)),
        Some(IntegerOrString::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected an integer, found \"{text}\"")))
        }
    }
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = integer_or_string(deserializer)?;
    Ok(raw.filter(|rating| *rating != 0))
}
