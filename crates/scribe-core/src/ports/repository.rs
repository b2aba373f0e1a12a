use async_trait::async_trait;

use crate::domain::{
    Album, AlbumDraft, Bookmark, Comment, ContactMessage, DirectoryEntry, NewComment,
    NewContactMessage, NewPost, NewUser, Post, Reaction, ReactionChange, ReactionCounts,
    ReactionKind, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist the full state of an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` if absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Credential store plus the follow graph.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Fails with `RepoError::Duplicate` when username or email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError>;

    async fn directory(&self) -> Result<Vec<DirectoryEntry>, RepoError>;

    /// Idempotent.
    async fn follow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError>;

    async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError>;

    async fn followers(&self, user_id: i64) -> Result<Vec<User>, RepoError>;

    async fn following(&self, user_id: i64) -> Result<Vec<User>, RepoError>;
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Fails with `RepoError::Duplicate` when the author already has the slug.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError>;

    async fn find_by_author_and_slug(
        &self,
        user_id: i64,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Atomically bump the view counter.
    async fn increment_view_count(&self, id: i64) -> Result<(), RepoError>;
}

/// Comments; deleting a comment deletes its replies.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    async fn insert(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Every comment of the post, replies included.
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;

    async fn count_top_level(&self, post_id: i64) -> Result<u64, RepoError>;
}

/// At most one reaction per (user, post).
#[async_trait]
pub trait ReactionRepository: BaseRepository<Reaction, i64> {
    async fn find(&self, user_id: i64, post_id: i64) -> Result<Option<Reaction>, RepoError>;

    /// Create the reaction or overwrite its kind.
    async fn upsert(
        &self,
        user_id: i64,
        post_id: i64,
        kind: ReactionKind,
    ) -> Result<ReactionChange, RepoError>;

    async fn counts(&self, post_id: i64) -> Result<ReactionCounts, RepoError>;
}

/// At most one bookmark per (user, post).
#[async_trait]
pub trait BookmarkRepository: BaseRepository<Bookmark, i64> {
    async fn find(&self, user_id: i64, post_id: i64) -> Result<Option<Bookmark>, RepoError>;

    async fn insert(&self, user_id: i64, post_id: i64) -> Result<Bookmark, RepoError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Bookmark>, RepoError>;

    async fn count_for_post(&self, post_id: i64) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait AlbumRepository: BaseRepository<Album, i64> {
    async fn insert(&self, album: AlbumDraft) -> Result<Album, RepoError>;

    async fn list(&self) -> Result<Vec<Album>, RepoError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn insert(&self, message: NewContactMessage) -> Result<ContactMessage, RepoError>;
}
