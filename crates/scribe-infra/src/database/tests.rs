use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};

use scribe_core::domain::{Post, PostStatus, ReactionChange, ReactionKind};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    BaseRepository, CommentRepository, PostRepository, ReactionRepository, UserRepository,
};

use super::entity::{post, reaction, user};
use super::postgres_base::write_error;
use super::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresReactionRepository,
    PostgresUserRepository, mask_email,
};

fn at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn post_model(id: i64) -> post::Model {
    post::Model {
        id,
        user_id: 3,
        title: "Test Post".to_owned(),
        slug: "test-post".to_owned(),
        description: String::new(),
        category: "rust".to_owned(),
        tags: "web,api".to_owned(),
        content: "Content".to_owned(),
        featured_image: "abc.png".to_owned(),
        featured_image_url: "http://localhost:8000/uploads/abc.png".to_owned(),
        view_count: 9,
        status: post::Status::Published,
        created_at: at().into(),
        updated_at: at().into(),
    }
}

fn reaction_model(kind: reaction::Kind) -> reaction::Model {
    reaction::Model {
        id: 11,
        post_id: 5,
        user_id: 2,
        kind,
        created_at: at().into(),
        updated_at: at().into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(1)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(1).await.unwrap().unwrap();

    assert_eq!(post.title, "Test Post");
    assert_eq!(post.tags, vec!["web", "api"]);
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.created_at, at());
}

#[tokio::test]
async fn test_find_user_by_email_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, i64>::delete(&repo, 404).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_increment_view_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.increment_view_count(1).await.is_ok());
    assert!(matches!(
        repo.increment_view_count(2).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_count_top_level_comments() {
    let row = BTreeMap::from([("num_items", Value::BigInt(Some(3)))]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    assert_eq!(repo.count_top_level(5).await.unwrap(), 3);
}

#[tokio::test]
async fn test_reaction_upsert_updates_existing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![reaction_model(reaction::Kind::Like)],
            vec![reaction_model(reaction::Kind::Dislike)],
        ])
        .into_connection();

    let repo = PostgresReactionRepository::new(db);
    let change = repo.upsert(2, 5, ReactionKind::Dislike).await.unwrap();

    assert!(matches!(change, ReactionChange::Updated(_)));
    assert_eq!(change.reaction().kind, ReactionKind::Dislike);
}

#[tokio::test]
async fn test_reaction_upsert_creates_new() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            Vec::<reaction::Model>::new(),
            vec![reaction_model(reaction::Kind::Like)],
        ])
        .into_connection();

    let repo = PostgresReactionRepository::new(db);
    let change = repo.upsert(2, 5, ReactionKind::Like).await.unwrap();

    assert!(matches!(change, ReactionChange::Created(r) if r.kind == ReactionKind::Like));
}

#[test]
fn test_write_error_classification() {
    assert!(matches!(
        write_error(DbErr::RecordNotUpdated),
        RepoError::NotFound
    ));
    assert!(matches!(
        write_error(DbErr::Custom("boom".to_string())),
        RepoError::Query(_)
    ));
}

#[test]
fn test_mask_email() {
    assert_eq!(mask_email("alice@example.com"), "a***@example.com");
    assert_eq!(mask_email("a@example.com"), "***@example.com");
    assert_eq!(mask_email("no-at-sign"), "***");
}
