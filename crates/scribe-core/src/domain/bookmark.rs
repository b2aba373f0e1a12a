use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post saved by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of toggling a bookmark.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkToggle {
    Added(Bookmark),
    Removed,
}
