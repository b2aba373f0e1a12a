//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All repositories created from one [`InMemoryDatabase`] share its tables, so
//! uniqueness rules and cascades behave like the relational schema.
//! Data is lost on process restart.

mod catalog;
mod content;
mod users;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use scribe_core::domain::{Album, Bookmark, Comment, ContactMessage, Post, Reaction, User};
use scribe_core::error::RepoError;

pub use catalog::{InMemoryAlbumRepository, InMemoryContactRepository};
pub use content::{
    InMemoryBookmarkRepository, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryReactionRepository,
};
pub use users::InMemoryUserRepository;

/// Rows keyed by an auto-incremented id.
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        self.next_id += 1;
        let row = build(self.next_id);
        self.rows.insert(self.next_id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn replace(&mut self, id: i64, row: T) -> Result<T, RepoError> {
        let slot = self.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        *slot = row.clone();
        Ok(row)
    }

    fn remove(&mut self, id: i64) -> Result<T, RepoError> {
        self.rows.remove(&id).ok_or(RepoError::NotFound)
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.values().find(|row| pred(row)).cloned()
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }

    fn any(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.rows.values().any(pred)
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    follows: BTreeSet<(i64, i64)>,
    posts: Table<Post>,
    comments: Table<Comment>,
    reactions: Table<Reaction>,
    bookmarks: Table<Bookmark>,
    albums: Table<Album>,
    contacts: Table<ContactMessage>,
}

/// Shared handle to the in-memory tables.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository::new(self.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository::new(self.clone())
    }

    pub fn reactions(&self) -> InMemoryReactionRepository {
        InMemoryReactionRepository::new(self.clone())
    }

    pub fn bookmarks(&self) -> InMemoryBookmarkRepository {
        InMemoryBookmarkRepository::new(self.clone())
    }

    pub fn albums(&self) -> InMemoryAlbumRepository {
        InMemoryAlbumRepository::new(self.clone())
    }

    pub fn contacts(&self) -> InMemoryContactRepository {
        InMemoryContactRepository::new(self.clone())
    }
}
