use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Like or dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(ReactionKind::Like),
            "dislike" => Ok(ReactionKind::Dislike),
            other => Err(DomainError::Validation(format!(
                "unknown reaction '{other}'"
            ))),
        }
    }
}

/// A user's single reaction to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of setting a reaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactionChange {
    Created(Reaction),
    Updated(Reaction),
}

impl ReactionChange {
    pub fn reaction(&self) -> &Reaction {
        match self {
            ReactionChange::Created(r) | ReactionChange::Updated(r) => r,
        }
    }
}

/// Aggregate reaction counts for a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: u64,
    pub dislikes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("like".parse::<ReactionKind>().unwrap(), ReactionKind::Like);
        assert_eq!(
            "dislike".parse::<ReactionKind>().unwrap(),
            ReactionKind::Dislike
        );
        assert!("love".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ReactionKind::Dislike).unwrap();
        assert_eq!(json, "\"dislike\"");
    }
}
