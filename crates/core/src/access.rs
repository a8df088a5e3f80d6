//! Ownership-based write authorization for video records.
//!
//! The guard is a pure decision: it never touches the store. Existence is
//! checked by the caller before the guard runs, so a missing record is always
//! reported as not-found and never as forbidden.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::UserId;
use crate::video::VideoRecord;

/// A mutating operation on an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
}

impl Mutation {
    pub fn verb(self) -> &'static str {
        match self {
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        }
    }
}

/// How records without an owner are treated. Applies to update and delete
/// alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerlessPolicy {
    /// Any authenticated principal may mutate an owner-less record.
    #[default]
    Open,
    /// Nobody may mutate an owner-less record.
    Locked,
}

impl FromStr for OwnerlessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "locked" => Ok(Self::Locked),
            other => Err(format!(
                "unknown owner-less policy '{other}', expected 'open' or 'locked'"
            )),
        }
    }
}

impl fmt::Display for OwnerlessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Locked => "locked",
        })
    }
}

/// Outcome of [`can_mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Decide whether `principal` may perform a mutation on `video`.
///
/// The same rule governs update and delete; the operation is part of the
/// signature so callers state what they are about to do.
pub fn can_mutate(
    principal: UserId,
    video: &VideoRecord,
    _op: Mutation,
    policy: OwnerlessPolicy,
) -> Access {
    match (video.owner_id(), policy) {
        (None, OwnerlessPolicy::Open) => Access::Allow,
        (None, OwnerlessPolicy::Locked) => Access::Deny,
        (Some(owner), _) if owner == principal => Access::Allow,
        (Some(_), _) => Access::Deny,
    }
}

/// [`can_mutate`], with a deny turned into [`CoreError::Forbidden`].
pub fn authorize(
    principal: UserId,
    video: &VideoRecord,
    op: Mutation,
    policy: OwnerlessPolicy,
) -> Result<(), CoreError> {
    match can_mutate(principal, video, op, policy) {
        Access::Allow => Ok(()),
        Access::Deny => Err(CoreError::Forbidden(format!(
            "Not authorized to {} this video",
            op.verb()
        ))),
    }
}
