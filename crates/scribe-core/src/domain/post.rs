use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "unknown post status '{other}'"
            ))),
        }
    }
}

/// Post entity - a blog post with a featured image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub content: String,
    pub featured_image: String,
    pub featured_image_url: String,
    pub view_count: i64,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub content: String,
    pub featured_image: String,
    pub featured_image_url: String,
}

/// Edit applied by the post's owner. Title and content are mandatory,
/// the rest is left untouched when absent.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

impl PostChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "title and content are required".to_string(),
            ));
        }
        if self.tags.as_ref().is_some_and(Vec::is_empty) {
            return Err(DomainError::Validation(
                "at least one tag is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Post {
    /// Apply an owner edit. Owner and view count are never touched.
    ///
    /// Returns true when the title changed, meaning the slug must be regenerated.
    pub fn apply(&mut self, changes: PostChanges) -> bool {
        let title = changes.title.trim().to_string();
        let title_changed = title != self.title;

        self.title = title;
        self.content = changes.content;
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = Utc::now();

        title_changed
    }
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Derive a URL slug from a title: lowercase ASCII alphanumerics separated
/// by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

/// Slug candidate for the n-th collision (`n >= 2`).
pub fn numbered_slug(base: &str, n: u32) -> String {
    format!("{base}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   2024 -- edition "), "rust-2024-edition");
        assert_eq!(slugify("Ünïcode only"), "n-code-only");
        assert_eq!(slugify("!!!"), "post");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("rust, web,, ,api"), vec!["rust", "web", "api"]);
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("Published".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_changes_require_title_and_content() {
        let changes = PostChanges {
            title: " ".to_string(),
            content: "body".to_string(),
            description: None,
            category: None,
            tags: None,
            status: None,
        };
        assert!(matches!(changes.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_changes_reject_empty_tag_list() {
        let mut changes = PostChanges {
            title: "t".to_string(),
            content: "body".to_string(),
            description: None,
            category: None,
            tags: Some(Vec::new()),
            status: None,
        };
        assert!(matches!(changes.validate(), Err(DomainError::Validation(_))));

        changes.tags = Some(vec!["rust".to_string()]);
        assert!(changes.validate().is_ok());
    }

    #[test]
    fn test_apply_reports_title_change() {
        let now = Utc::now();
        let mut post = Post {
            id: 1,
            user_id: 7,
            title: "First".to_string(),
            slug: "first".to_string(),
            description: String::new(),
            category: "misc".to_string(),
            tags: vec!["a".to_string()],
            content: "old".to_string(),
            featured_image: String::new(),
            featured_image_url: String::new(),
            view_count: 3,
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        let changed = post.apply(PostChanges {
            title: "Second".to_string(),
            content: "new".to_string(),
            description: None,
            category: None,
            tags: None,
            status: Some(PostStatus::Published),
        });

        assert!(changed);
        assert_eq!(post.user_id, 7);
        assert_eq!(post.view_count, 3);
        assert_eq!(post.category, "misc");
        assert_eq!(post.status, PostStatus::Published);
    }
}
