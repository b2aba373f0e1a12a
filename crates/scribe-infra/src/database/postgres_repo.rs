//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use scribe_core::domain::{
    Album, AlbumDraft, Bookmark, Comment, ContactMessage, DirectoryEntry, NewComment,
    NewContactMessage, NewPost, NewUser, Post, PostStatus, Reaction, ReactionChange,
    ReactionCounts, ReactionKind, User,
};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    AlbumRepository, BookmarkRepository, CommentRepository, ContactRepository, PostRepository,
    ReactionRepository, UserRepository,
};

use super::entity::{album, bookmark, comment, contact, follow, post, reaction, user};
use super::postgres_base::{PostgresBaseRepository, read_error, write_error};

pub type PostgresUserRepository = PostgresBaseRepository<user::Entity>;
pub type PostgresPostRepository = PostgresBaseRepository<post::Entity>;
pub type PostgresCommentRepository = PostgresBaseRepository<comment::Entity>;
pub type PostgresReactionRepository = PostgresBaseRepository<reaction::Entity>;
pub type PostgresBookmarkRepository = PostgresBaseRepository<bookmark::Entity>;
pub type PostgresAlbumRepository = PostgresBaseRepository<album::Entity>;
pub type PostgresContactRepository = PostgresBaseRepository<contact::Entity>;

/// Keep the first character of the local part, for logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            bio: Set(String::new()),
            avatar_url: Set(String::new()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn directory(&self) -> Result<Vec<DirectoryEntry>, RepoError> {
        let rows: Vec<(String, String)> = user::Entity::find()
            .select_only()
            .column(user::Column::Username)
            .column(user::Column::Email)
            .order_by_asc(user::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(rows
            .into_iter()
            .map(|(username, email)| DirectoryEntry { username, email })
            .collect())
    }

    async fn follow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError> {
        let edge = follow::ActiveModel {
            follower_id: Set(follower_id),
            following_id: Set(following_id),
            created_at: Set(Utc::now().into()),
        };

        follow::Entity::insert(edge)
            .on_conflict(
                OnConflict::columns([follow::Column::FollowerId, follow::Column::FollowingId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError> {
        follow::Entity::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        let edges = Query::select()
            .column(follow::Column::FollowerId)
            .from(follow::Entity)
            .and_where(follow::Column::FollowingId.eq(user_id))
            .to_owned();

        let result = user::Entity::find()
            .filter(user::Column::Id.in_subquery(edges))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        let edges = Query::select()
            .column(follow::Column::FollowingId)
            .from(follow::Entity)
            .and_where(follow::Column::FollowerId.eq(user_id))
            .to_owned();

        let result = user::Entity::find()
            .filter(user::Column::Id.in_subquery(edges))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let model = post::ActiveModel {
            id: NotSet,
            user_id: Set(new.user_id),
            title: Set(new.title),
            slug: Set(new.slug),
            description: Set(new.description),
            category: Set(new.category),
            tags: Set(new.tags.join(",")),
            content: Set(new.content),
            featured_image: Set(new.featured_image),
            featured_image_url: Set(new.featured_image_url),
            view_count: Set(0),
            status: Set(PostStatus::Draft.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author_and_slug(
        &self,
        user_id: i64,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::UserId.eq(user_id))
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn increment_view_count(&self, id: i64) -> Result<(), RepoError> {
        let result = post::Entity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let now = Utc::now();
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new.post_id),
            user_id: Set(new.user_id),
            username: Set(new.username),
            parent_id: Set(new.parent_id),
            content: Set(new.content),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_top_level(&self, post_id: i64) -> Result<u64, RepoError> {
        comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::ParentId.is_null())
            .count(&self.db)
            .await
            .map_err(read_error)
    }
}

impl PostgresReactionRepository {
    async fn set_kind(&self, existing: Reaction, kind: ReactionKind) -> Result<Reaction, RepoError> {
        let mut active: reaction::ActiveModel = existing.into();
        active.kind = Set(kind.into());
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await.map_err(write_error)?;
        Ok(model.into())
    }
}

#[async_trait]
impl ReactionRepository for PostgresReactionRepository {
    async fn find(&self, user_id: i64, post_id: i64) -> Result<Option<Reaction>, RepoError> {
        let result = reaction::Entity::find()
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn upsert(
        &self,
        user_id: i64,
        post_id: i64,
        kind: ReactionKind,
    ) -> Result<ReactionChange, RepoError> {
        if let Some(existing) = self.find(user_id, post_id).await? {
            return Ok(ReactionChange::Updated(self.set_kind(existing, kind).await?));
        }

        let now = Utc::now();
        let inserted = reaction::ActiveModel {
            id: NotSet,
            post_id: Set(post_id),
            user_id: Set(user_id),
            kind: Set(kind.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(write_error);

        match inserted {
            Ok(model) => Ok(ReactionChange::Created(model.into())),
            // Lost a race with a concurrent insert for the same pair.
            Err(RepoError::Duplicate(_)) => {
                let existing = self
                    .find(user_id, post_id)
                    .await?
                    .ok_or(RepoError::NotFound)?;
                Ok(ReactionChange::Updated(self.set_kind(existing, kind).await?))
            }
            Err(e) => Err(e),
        }
    }

    async fn counts(&self, post_id: i64) -> Result<ReactionCounts, RepoError> {
        let count_kind = |kind: reaction::Kind| {
            reaction::Entity::find()
                .filter(reaction::Column::PostId.eq(post_id))
                .filter(reaction::Column::Kind.eq(kind))
                .count(&self.db)
        };

        let likes = count_kind(reaction::Kind::Like).await.map_err(read_error)?;
        let dislikes = count_kind(reaction::Kind::Dislike)
            .await
            .map_err(read_error)?;

        Ok(ReactionCounts { likes, dislikes })
    }
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    async fn find(&self, user_id: i64, post_id: i64) -> Result<Option<Bookmark>, RepoError> {
        let result = bookmark::Entity::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, user_id: i64, post_id: i64) -> Result<Bookmark, RepoError> {
        let model = bookmark::ActiveModel {
            id: NotSet,
            post_id: Set(post_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Bookmark>, RepoError> {
        let result = bookmark::Entity::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .order_by_desc(bookmark::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_for_post(&self, post_id: i64) -> Result<u64, RepoError> {
        bookmark::Entity::find()
            .filter(bookmark::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(read_error)
    }
}

#[async_trait]
impl AlbumRepository for PostgresAlbumRepository {
    async fn insert(&self, draft: AlbumDraft) -> Result<Album, RepoError> {
        let model = album::ActiveModel {
            id: NotSet,
            title: Set(draft.title),
            artist: Set(draft.artist),
            price: Set(draft.price),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn list(&self) -> Result<Vec<Album>, RepoError> {
        let result = album::Entity::find()
            .order_by_asc(album::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn insert(&self, new: NewContactMessage) -> Result<ContactMessage, RepoError> {
        let model = contact::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            email: Set(new.email),
            subject: Set(new.subject),
            message: Set(new.message),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }
}
