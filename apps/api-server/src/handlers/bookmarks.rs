//! Bookmark toggling and listing.

use actix_web::{HttpResponse, web};

use scribe_core::domain::BookmarkToggle;
use scribe_core::ownership::ensure_owner;
use scribe_shared::MessageResponse;
use scribe_shared::dto::BookmarkCountResponse;

use super::posts::load_post;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

async fn toggle(state: &AppState, user_id: i64, post_id: i64) -> AppResult<BookmarkToggle> {
    match state.repos.bookmarks.find(user_id, post_id).await? {
        Some(existing) => {
            ensure_owner(&existing, user_id)?;
            state.repos.bookmarks.delete(existing.id).await?;
            Ok(BookmarkToggle::Removed)
        }
        None => {
            let bookmark = state.repos.bookmarks.insert(user_id, post_id).await?;
            Ok(BookmarkToggle::Added(bookmark))
        }
    }
}

/// POST /posts/{id}/bookmark
pub async fn toggle_bookmark(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;

    let message = match toggle(&state, identity.subject_id, post.id).await? {
        BookmarkToggle::Added(bookmark) => {
            tracing::debug!(bookmark_id = bookmark.id, post_id = post.id, "Bookmark added");
            "Post bookmarked"
        }
        BookmarkToggle::Removed => "Bookmark removed",
    };

    Ok(HttpResponse::Accepted().json(MessageResponse::new(message)))
}

/// GET /bookmarks - the caller's bookmarks.
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let bookmarks = state
        .repos
        .bookmarks
        .list_by_user(identity.subject_id)
        .await?;

    let body: Vec<_> = bookmarks.into_iter().map(views::bookmark).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}/bookmarks/count
pub async fn count(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    let bookmark_count = state.repos.bookmarks.count_for_post(post.id).await?;

    Ok(HttpResponse::Ok().json(BookmarkCountResponse { bookmark_count }))
}
