//! Query filter builder for the video listing.
//!
//! Turns untrusted `?title=&actress=&genre=&rating=` parameters into a
//! [`VideoFilter`]. Building a filter never fails: malformed optional input
//! simply contributes no predicate.
//!
//! Client text is held verbatim inside [`Needle`]s and is never interpreted
//! as a pattern language. Store backends translate needles with
//! [`Needle::like_pattern`] (SQL) or [`Needle::matches`] (in-memory).

use serde::Deserialize;

use crate::video::VideoRecord;

/// Raw filter parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoFilterParams {
    pub title: Option<String>,
    pub actress: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<String>,
}

/// A case-insensitive substring to look for. Always treated as a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    text: String,
    folded: String,
}

impl Needle {
    /// Trim `raw`; blank input yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            folded: text.to_lowercase(),
        })
    }

    /// Keep `raw` exactly as sent; only empty input yields `None`.
    pub fn verbatim(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            text: raw.to_string(),
            folded: raw.to_lowercase(),
        })
    }

    /// The client text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive substring test.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }

    /// `%needle%` for use with SQL `ILIKE`, with the default escape character
    /// (`\`) and the wildcards `%` / `_` escaped so they match literally.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.text.len() + 2);
        pattern.push('%');
        for c in self.text.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Structured predicate set for the video listing.
///
/// All supplied predicates are combined with AND. Within `performers` and
/// `genres`, alternatives are combined with OR: a record matches when any
/// alternative is a substring of any element of the array field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoFilter {
    title: Option<Needle>,
    performers: Vec<Needle>,
    genres: Vec<Needle>,
    min_rating: Option<i64>,
}

impl VideoFilter {
    pub fn from_params(params: &VideoFilterParams) -> Self {
        Self {
            title: params.title.as_deref().and_then(Needle::verbatim),
            performers: alternatives(params.actress.as_deref()),
            genres: alternatives(params.genre.as_deref()),
            min_rating: params.rating.as_deref().and_then(parse_rating),
        }
    }

    pub fn title(&self) -> Option<&Needle> {
        self.title.as_ref()
    }

    pub fn performers(&self) -> &[Needle] {
        &self.performers
    }

    pub fn genres(&self) -> &[Needle] {
        &self.genres
    }

    pub fn min_rating(&self) -> Option<i64> {
        self.min_rating
    }

    /// `true` when no predicate was supplied.
    pub fn is_unconstrained(&self) -> bool {
        self.title.is_none()
            && self.performers.is_empty()
            && self.genres.is_empty()
            && self.min_rating.is_none()
    }

    /// Evaluate the predicate set against a record.
    pub fn matches(&self, video: &VideoRecord) -> bool {
        if let Some(title) = &self.title {
            if !title.matches(&video.title) {
                return false;
            }
        }
        if !any_alternative(&self.performers, &video.performers) {
            return false;
        }
        if !any_alternative(&self.genres, &video.genres) {
            return false;
        }
        match self.min_rating {
            Some(min) => i64::from(video.rating) >= min,
            None => true,
        }
    }
}

/// Split a comma-separated list into needles, dropping blank and repeated
/// segments.
fn alternatives(raw: Option<&str>) -> Vec<Needle> {
    let mut needles: Vec<Needle> = Vec::new();
    for needle in raw.unwrap_or_default().split(',').filter_map(Needle::new) {
        if !needles.iter().any(|n| n.folded == needle.folded) {
            needles.push(needle);
        }
    }
    needles
}

/// Non-numeric ratings are ignored rather than rejected.
fn parse_rating(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn any_alternative(needles: &[Needle], values: &[String]) -> bool {
    needles.is_empty()
        || needles
            .iter()
            .any(|needle| values.iter().any(|value| needle.matches(value)))
}
