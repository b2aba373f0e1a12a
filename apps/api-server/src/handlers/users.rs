//! Profiles, avatars and the follow graph.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use scribe_core::domain::media::AVATAR_FOLDER;
use scribe_core::domain::{ProfileChanges, User};
use scribe_core::ownership::ensure_owner;
use scribe_core::{DomainError, RepoError};
use scribe_shared::MessageResponse;
use scribe_shared::dto::{
    DirectoryEntryResponse, DirectoryResponse, FollowersResponse, FollowingResponse,
    UpdateUserRequest,
};

use super::upload::{FormSpec, MultipartForm, serve_image};
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const AVATAR_ROUTE: &str = "/users/uploads/avatars/";

const AVATAR_FORM: FormSpec = FormSpec {
    fields: &[],
    files: &["avatar"],
};

pub(super) async fn load_user(state: &AppState, id: i64) -> AppResult<User> {
    state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("user", id))
}

fn duplicate_profile(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(_) => {
            DomainError::Duplicate("username or email already exists".to_string()).into()
        }
        other => other.into(),
    }
}

/// GET /users - the caller's own profile.
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = load_user(&state, identity.subject_id).await?;
    Ok(HttpResponse::Ok().json(views::user(user)))
}

/// GET /users/{username}
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = state
        .repos
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::not_found("user", &username))?;

    Ok(HttpResponse::Ok().json(views::user(user)))
}

/// PUT /users/{id} - owner only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let mut user = load_user(&state, path.into_inner()).await?;
    ensure_owner(&user, identity.subject_id)?;

    let req = body.into_inner();
    user.apply(ProfileChanges {
        username: req.username,
        email: req.email,
        bio: req.bio,
    });

    let user = state
        .repos
        .users
        .update(user)
        .await
        .map_err(duplicate_profile)?;
    tracing::info!(user_id = user.id, "Profile updated");

    Ok(HttpResponse::Ok().json(views::user(user)))
}

/// POST /users/{id}/avatar - multipart field `avatar`, owner only.
pub async fn upload_avatar(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut user = load_user(&state, path.into_inner()).await?;
    ensure_owner(&user, identity.subject_id)?;

    let mut form = MultipartForm::read(payload, AVATAR_FORM, state.http.upload_max_bytes).await?;
    let file = form
        .take_file("avatar")
        .ok_or_else(|| AppError::bad_request("avatar file is required"))?;

    let name = file.store_image(state.storage.as_ref(), AVATAR_FOLDER).await?;
    let previous = std::mem::replace(
        &mut user.avatar_url,
        format!("{}{AVATAR_ROUTE}{name}", state.http.public_base_url),
    );
    user.updated_at = chrono::Utc::now();

    let user = match state.repos.users.update(user).await {
        Ok(user) => user,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(AVATAR_FOLDER, &name).await {
                tracing::warn!(error = %cleanup, "Failed to remove orphaned avatar");
            }
            return Err(e.into());
        }
    };

    if let Some((_, old)) = previous.rsplit_once(AVATAR_ROUTE) {
        if let Err(e) = state.storage.delete(AVATAR_FOLDER, old).await {
            tracing::warn!(error = %e, "Failed to remove previous avatar");
        }
    }

    Ok(HttpResponse::Ok().json(views::user(user)))
}

/// GET /users/uploads/avatars/{filename}
pub async fn avatar_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    serve_image(state.storage.as_ref(), AVATAR_FOLDER, &path.into_inner()).await
}

/// POST /users/follow/{id}
pub async fn follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let target = path.into_inner();
    if target == identity.subject_id {
        return Err(AppError::bad_request("you cannot follow yourself"));
    }
    load_user(&state, target).await?;

    state.repos.users.follow(identity.subject_id, target).await?;
    tracing::debug!(follower = identity.subject_id, following = target, "Followed user");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Followed user successfully")))
}

/// DELETE /users/unfollow/{id}
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .repos
        .users
        .unfollow(identity.subject_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Unfollowed user successfully")))
}

/// GET /users/{id}/followers
pub async fn followers(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let user = load_user(&state, path.into_inner()).await?;
    let followers = state.repos.users.followers(user.id).await?;

    Ok(HttpResponse::Ok().json(FollowersResponse {
        followers: views::users(followers),
    }))
}

/// GET /users/{id}/following
pub async fn following(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let user = load_user(&state, path.into_inner()).await?;
    let following = state.repos.users.following(user.id).await?;

    Ok(HttpResponse::Ok().json(FollowingResponse {
        following: views::users(following),
    }))
}

/// GET /users-emails
pub async fn directory(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state
        .repos
        .users
        .directory()
        .await?
        .into_iter()
        .map(|entry| DirectoryEntryResponse {
            username: entry.username,
            email: entry.email,
        })
        .collect();

    Ok(HttpResponse::Ok().json(DirectoryResponse { users }))
}
