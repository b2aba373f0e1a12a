//! Album catalog.

use actix_web::{HttpResponse, web};

use scribe_core::domain::{Album, AlbumDraft};
use scribe_shared::MessageResponse;
use scribe_shared::dto::AlbumRequest;

use super::views;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn draft(req: AlbumRequest) -> AppResult<AlbumDraft> {
    let draft = AlbumDraft {
        title: req.title.trim().to_string(),
        artist: req.artist.trim().to_string(),
        price: req.price,
    };
    draft.validate()?;
    Ok(draft)
}

async fn load_album(state: &AppState, id: i64) -> AppResult<Album> {
    state
        .repos
        .albums
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("album", id))
}

/// GET /albums
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let albums = state.repos.albums.list().await?;
    let body: Vec<_> = albums.into_iter().map(views::album).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /albums
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<AlbumRequest>,
) -> AppResult<HttpResponse> {
    let album = state.repos.albums.insert(draft(body.into_inner())?).await?;
    Ok(HttpResponse::Created().json(views::album(album)))
}

/// GET /albums/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let album = load_album(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::album(album)))
}

/// PUT /albums/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<AlbumRequest>,
) -> AppResult<HttpResponse> {
    let album = load_album(&state, path.into_inner()).await?;
    let draft = draft(body.into_inner())?;

    let album = state
        .repos
        .albums
        .update(Album {
            id: album.id,
            title: draft.title,
            artist: draft.artist,
            price: draft.price,
        })
        .await?;
    Ok(HttpResponse::Ok().json(views::album(album)))
}

/// DELETE /albums/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.repos.albums.delete(id).await.map_err(|e| match e {
        scribe_core::RepoError::NotFound => AppError::not_found("album", id),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Album deleted successfully")))
}
