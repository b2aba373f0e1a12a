use async_trait::async_trait;
use chrono::Utc;

use scribe_core::domain::{
    Bookmark, Comment, NewComment, NewPost, Post, PostStatus, Reaction, ReactionChange,
    ReactionCounts, ReactionKind,
};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    BaseRepository, BookmarkRepository, CommentRepository, PostRepository, ReactionRepository,
};

use super::{InMemoryDatabase, Tables};

macro_rules! repository {
    ($name:ident) => {
        pub struct $name {
            db: InMemoryDatabase,
        }

        impl $name {
            pub(super) fn new(db: InMemoryDatabase) -> Self {
                Self { db }
            }
        }
    };
}

repository!(InMemoryPostRepository);
repository!(InMemoryCommentRepository);
repository!(InMemoryReactionRepository);
repository!(InMemoryBookmarkRepository);

fn slug_taken(tables: &Tables, id: i64, user_id: i64, slug: &str) -> bool {
    tables
        .posts
        .any(|p| p.id != id && p.user_id == user_id && p.slug == slug)
}

/// Ids of `root` and every reply below it.
fn comment_subtree(tables: &Tables, root: i64) -> Vec<i64> {
    let mut ids = vec![root];
    let mut cursor = 0;
    while cursor < ids.len() {
        let parent = ids[cursor];
        ids.extend(
            tables
                .comments
                .rows
                .values()
                .filter(|c| c.parent_id == Some(parent))
                .map(|c| c.id),
        );
        cursor += 1;
    }
    ids
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.db.tables.read().await.posts.get(id))
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.db.tables.write().await;
        if slug_taken(&tables, post.id, post.user_id, &post.slug) {
            return Err(RepoError::Duplicate("posts_user_id_slug_key".to_string()));
        }
        tables.posts.replace(post.id, post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.posts.remove(id)?;
        tables.comments.rows.retain(|_, c| c.post_id != id);
        tables.reactions.rows.retain(|_, r| r.post_id != id);
        tables.bookmarks.rows.retain(|_, b| b.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.db.tables.write().await;
        if slug_taken(&tables, 0, new.user_id, &new.slug) {
            return Err(RepoError::Duplicate("posts_user_id_slug_key".to_string()));
        }

        let now = Utc::now();
        Ok(tables.posts.insert_with(|id| Post {
            id,
            user_id: new.user_id,
            title: new.title,
            slug: new.slug,
            description: new.description,
            category: new.category,
            tags: new.tags,
            content: new.content,
            featured_image: new.featured_image,
            featured_image_url: new.featured_image_url,
            view_count: 0,
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.db.tables.read().await;
        // Ids grow with insertion time.
        Ok(tables.posts.rows.values().rev().cloned().collect())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.db.tables.read().await;
        let mut posts = tables.posts.filter(|p| p.user_id == user_id);
        posts.reverse();
        Ok(posts)
    }

    async fn find_by_author_and_slug(
        &self,
        user_id: i64,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .posts
            .find(|p| p.user_id == user_id && p.slug == slug))
    }

    async fn increment_view_count(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        let post = tables.posts.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.view_count += 1;
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.db.tables.read().await.comments.get(id))
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.comments.replace(comment.id, comment)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.comments.get(id).is_none() {
            return Err(RepoError::NotFound);
        }
        for doomed in comment_subtree(&tables, id) {
            tables.comments.rows.remove(&doomed);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.posts.get(new.post_id).is_none() {
            return Err(RepoError::ForeignKey("comments_post_id_fkey".to_string()));
        }

        let now = Utc::now();
        Ok(tables.comments.insert_with(|id| Comment {
            id,
            post_id: new.post_id,
            user_id: new.user_id,
            username: new.username,
            parent_id: new.parent_id,
            content: new.content,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.comments.filter(|c| c.post_id == post_id))
    }

    async fn count_top_level(&self, post_id: i64) -> Result<u64, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .comments
            .rows
            .values()
            .filter(|c| c.post_id == post_id && c.parent_id.is_none())
            .count() as u64)
    }
}

#[async_trait]
impl BaseRepository<Reaction, i64> for InMemoryReactionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Reaction>, RepoError> {
        Ok(self.db.tables.read().await.reactions.get(id))
    }

    async fn update(&self, reaction: Reaction) -> Result<Reaction, RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.reactions.replace(reaction.id, reaction)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.db.tables.write().await.reactions.remove(id).map(|_| ())
    }
}

#[async_trait]
impl ReactionRepository for InMemoryReactionRepository {
    async fn find(&self, user_id: i64, post_id: i64) -> Result<Option<Reaction>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .reactions
            .find(|r| r.user_id == user_id && r.post_id == post_id))
    }

    async fn upsert(
        &self,
        user_id: i64,
        post_id: i64,
        kind: ReactionKind,
    ) -> Result<ReactionChange, RepoError> {
        let mut tables = self.db.tables.write().await;
        let now = Utc::now();

        let existing = tables
            .reactions
            .rows
            .values_mut()
            .find(|r| r.user_id == user_id && r.post_id == post_id);

        if let Some(reaction) = existing {
            reaction.kind = kind;
            reaction.updated_at = now;
            return Ok(ReactionChange::Updated(reaction.clone()));
        }

        Ok(ReactionChange::Created(tables.reactions.insert_with(
            |id| Reaction {
                id,
                post_id,
                user_id,
                kind,
                created_at: now,
                updated_at: now,
            },
        )))
    }

    async fn counts(&self, post_id: i64) -> Result<ReactionCounts, RepoError> {
        let tables = self.db.tables.read().await;
        let mut counts = ReactionCounts::default();
        for reaction in tables.reactions.rows.values() {
            if reaction.post_id != post_id {
                continue;
            }
            match reaction.kind {
                ReactionKind::Like => counts.likes += 1,
                ReactionKind::Dislike => counts.dislikes += 1,
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl BaseRepository<Bookmark, i64> for InMemoryBookmarkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>, RepoError> {
        Ok(self.db.tables.read().await.bookmarks.get(id))
    }

    async fn update(&self, bookmark: Bookmark) -> Result<Bookmark, RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.bookmarks.replace(bookmark.id, bookmark)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.db.tables.write().await.bookmarks.remove(id).map(|_| ())
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn find(&self, user_id: i64, post_id: i64) -> Result<Option<Bookmark>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .bookmarks
            .find(|b| b.user_id == user_id && b.post_id == post_id))
    }

    async fn insert(&self, user_id: i64, post_id: i64) -> Result<Bookmark, RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables
            .bookmarks
            .any(|b| b.user_id == user_id && b.post_id == post_id)
        {
            return Err(RepoError::Duplicate(
                "bookmarks_user_id_post_id_key".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(tables.bookmarks.insert_with(|id| Bookmark {
            id,
            post_id,
            user_id,
            created_at: now,
        }))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Bookmark>, RepoError> {
        let tables = self.db.tables.read().await;
        let mut bookmarks = tables.bookmarks.filter(|b| b.user_id == user_id);
        bookmarks.reverse();
        Ok(bookmarks)
    }

    async fn count_for_post(&self, post_id: i64) -> Result<u64, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .bookmarks
            .rows
            .values()
            .filter(|b| b.post_id == post_id)
            .count() as u64)
    }
}
