//! Like/dislike reactions.

use actix_web::{HttpResponse, web};

use scribe_core::domain::{ReactionChange, ReactionKind};
use scribe_core::ownership::ensure_owner;
use scribe_shared::MessageResponse;
use scribe_shared::dto::ReactionSummaryResponse;

use super::posts::load_post;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn react(
    state: &AppState,
    identity: &Identity,
    post_id: i64,
    kind: ReactionKind,
) -> AppResult<HttpResponse> {
    let post = load_post(state, post_id).await?;
    let change = state
        .repos
        .reactions
        .upsert(identity.subject_id, post.id, kind)
        .await?;

    let body = views::reaction(change.reaction());
    Ok(match change {
        ReactionChange::Created(_) => HttpResponse::Created().json(body),
        ReactionChange::Updated(_) => HttpResponse::Ok().json(body),
    })
}

/// POST /posts/{id}/like
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    react(&state, &identity, path.into_inner(), ReactionKind::Like).await
}

/// POST /posts/{id}/dislike
pub async fn dislike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    react(&state, &identity, path.into_inner(), ReactionKind::Dislike).await
}

/// DELETE /posts/{id}/reaction
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let reaction = state
        .repos
        .reactions
        .find(identity.subject_id, post_id)
        .await?
        .ok_or_else(|| AppError::not_found("reaction", post_id))?;
    ensure_owner(&reaction, identity.subject_id)?;

    state.repos.reactions.delete(reaction.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Reaction removed")))
}

/// GET /posts/{id}/reactions
pub async fn summary(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;

    let counts = state.repos.reactions.counts(post.id).await?;
    let own = state
        .repos
        .reactions
        .find(identity.subject_id, post.id)
        .await?;

    Ok(HttpResponse::Ok().json(ReactionSummaryResponse {
        likes: counts.likes,
        dislikes: counts.dislikes,
        user_reaction: own.map(|r| r.kind.to_string()),
    }))
}
