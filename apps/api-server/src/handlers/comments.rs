//! Threaded comments.

use actix_web::{HttpResponse, web};

use scribe_core::domain::{Comment, CommentThread, NewComment, build_threads};
use scribe_core::ownership::ensure_owner;
use scribe_shared::MessageResponse;
use scribe_shared::dto::{CommentListResponse, CommentQuery, CommentRequest};

use super::posts::load_post;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn load_comment(state: &AppState, id: i64) -> AppResult<Comment> {
    state
        .repos
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("comment", id))
}

fn required_content(content: String) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::bad_request("content is required"));
    }
    Ok(content.to_string())
}

fn single(comment: Comment) -> CommentThread {
    CommentThread {
        comment,
        replies: Vec::new(),
    }
}

/// POST /posts/{id}/comments?parent_id=
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    query: web::Query<CommentQuery>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    let content = required_content(body.into_inner().content)?;

    if let Some(parent_id) = query.parent_id {
        let parent = state.repos.comments.find_by_id(parent_id).await?;
        if parent.is_none_or(|p| p.post_id != post.id) {
            return Err(AppError::bad_request(
                "parent comment does not belong to this post",
            ));
        }
    }

    let comment = state
        .repos
        .comments
        .insert(NewComment {
            post_id: post.id,
            user_id: identity.subject_id,
            username: identity.display_name,
            parent_id: query.parent_id,
            content,
        })
        .await?;
    tracing::debug!(comment_id = comment.id, post_id = post.id, "Comment added");

    Ok(HttpResponse::Created().json(views::comment_thread(single(comment))))
}

/// GET /posts/{id}/comments - reply trees plus the top-level count.
pub async fn list(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;

    let comments = state.repos.comments.find_by_post_id(post.id).await?;
    let count = state.repos.comments.count_top_level(post.id).await?;

    Ok(HttpResponse::Ok().json(CommentListResponse {
        comments: build_threads(comments)
            .into_iter()
            .map(views::comment_thread)
            .collect(),
        count,
    }))
}

/// PUT /comments/{id} - owner only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let mut comment = load_comment(&state, path.into_inner()).await?;
    ensure_owner(&comment, identity.subject_id)?;

    comment.content = required_content(body.into_inner().content)?;
    comment.updated_at = chrono::Utc::now();
    let comment = state.repos.comments.update(comment).await?;

    Ok(HttpResponse::Ok().json(views::comment_thread(single(comment))))
}

/// DELETE /comments/{id} - owner only; replies go with it.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let comment = load_comment(&state, path.into_inner()).await?;
    ensure_owner(&comment, identity.subject_id)?;

    state.repos.comments.delete(comment.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}
