//! Posts and their featured images.

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use scribe_core::domain::media::POST_IMAGE_FOLDER;
use scribe_core::domain::{
    NewPost, Post, PostChanges, PostStatus, numbered_slug, parse_tags, slugify,
};
use scribe_core::ownership::ensure_owner;
use scribe_core::{DomainError, RepoError};
use scribe_shared::MessageResponse;
use scribe_shared::dto::UpdatePostRequest;

use super::upload::{FormSpec, MultipartForm, serve_image};
use super::users::load_user;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_SLUG_ATTEMPTS: u32 = 100;

const POST_FORM: FormSpec = FormSpec {
    fields: &["title", "content", "description", "category", "tags"],
    files: &["image"],
};

pub(super) async fn load_post(state: &AppState, id: i64) -> AppResult<Post> {
    state
        .repos
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("post", id))
}

/// First free slug for the author: `base`, then `base-2`, `base-3`, ...
async fn unique_slug(
    state: &AppState,
    user_id: i64,
    title: &str,
    own_post: Option<i64>,
) -> AppResult<String> {
    let base = slugify(title);
    for n in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = if n == 1 {
            base.clone()
        } else {
            numbered_slug(&base, n)
        };

        match state
            .repos
            .posts
            .find_by_author_and_slug(user_id, &candidate)
            .await?
        {
            Some(existing) if Some(existing.id) != own_post => continue,
            _ => return Ok(candidate),
        }
    }

    Err(DomainError::Duplicate(format!("too many posts titled '{title}'")).into())
}

fn slug_conflict(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(_) => {
            DomainError::Duplicate("a post with this slug already exists".to_string()).into()
        }
        other => other.into(),
    }
}

/// POST /posts - multipart with a featured `image`.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut form = MultipartForm::read(payload, POST_FORM, state.http.upload_max_bytes).await?;

    let title = form.text("title").to_string();
    let content = form.text("content").to_string();
    let description = form.text("description").to_string();
    let category = form.text("category").to_string();
    if [&title, &content, &description, &category]
        .iter()
        .any(|f| f.is_empty())
    {
        return Err(AppError::bad_request(
            "title, content, description and category are required",
        ));
    }

    let tags = parse_tags(form.text("tags"));
    if tags.is_empty() {
        return Err(AppError::bad_request("at least one tag is required"));
    }

    let image = form
        .take_file("image")
        .ok_or_else(|| AppError::bad_request("image file is required"))?;
    let author = load_user(&state, identity.subject_id).await?;
    let slug = unique_slug(&state, author.id, &title, None).await?;

    let featured_image = image
        .store_image(state.storage.as_ref(), POST_IMAGE_FOLDER)
        .await?;
    let featured_image_url = format!("{}/uploads/{featured_image}", state.http.public_base_url);

    let inserted = state
        .repos
        .posts
        .insert(NewPost {
            user_id: author.id,
            title,
            slug,
            description,
            category,
            tags,
            content,
            featured_image: featured_image.clone(),
            featured_image_url,
        })
        .await;

    let post = match inserted {
        Ok(post) => post,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(POST_IMAGE_FOLDER, &featured_image).await {
                tracing::warn!(error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(slug_conflict(e));
        }
    };

    tracing::info!(post_id = post.id, user_id = author.id, "Post created");
    Ok(HttpResponse::Created().json(views::post(post, Some(&author))))
}

/// GET /posts - newest first, each with its author.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.repos.posts.list_all().await?;

    let mut author_ids: Vec<i64> = posts.iter().map(|p| p.user_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let authors: HashMap<i64, _> = state
        .repos
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let body: Vec<_> = posts
        .into_iter()
        .map(|post| {
            let author = authors.get(&post.user_id);
            views::post(post, author)
        })
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /users/{id}/posts
pub async fn by_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let author = load_user(&state, path.into_inner()).await?;
    let posts = state.repos.posts.find_by_user_id(author.id).await?;

    let body: Vec<_> = posts
        .into_iter()
        .map(|post| views::post(post, Some(&author)))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{username}/{slug} - counts a view.
pub async fn by_slug(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (username, slug) = path.into_inner();

    let author = state
        .repos
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::not_found("post", &slug))?;
    let post = state
        .repos
        .posts
        .find_by_author_and_slug(author.id, &slug)
        .await?
        .ok_or_else(|| AppError::not_found("post", &slug))?;

    state.repos.posts.increment_view_count(post.id).await?;
    let post = load_post(&state, post.id).await?;

    Ok(HttpResponse::Ok().json(views::post(post, Some(&author))))
}

/// PUT /posts/{id} - owner only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let mut post = load_post(&state, path.into_inner()).await?;
    ensure_owner(&post, identity.subject_id)?;

    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        description: req.description,
        category: req.category,
        // Same rules as on create; commas would split on the way back from storage.
        tags: req.tags.map(|tags| parse_tags(&tags.join(","))),
        status: req
            .status
            .as_deref()
            .map(str::parse::<PostStatus>)
            .transpose()?,
    };
    changes.validate()?;

    if post.apply(changes) {
        post.slug = unique_slug(&state, post.user_id, &post.title, Some(post.id)).await?;
    }

    let post = state
        .repos
        .posts
        .update(post)
        .await
        .map_err(slug_conflict)?;
    tracing::info!(post_id = post.id, "Post updated");

    Ok(HttpResponse::Ok().json(views::post(post, None)))
}

/// DELETE /posts/{id} - owner only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    ensure_owner(&post, identity.subject_id)?;

    state.repos.posts.delete(post.id).await?;
    if let Err(e) = state
        .storage
        .delete(POST_IMAGE_FOLDER, &post.featured_image)
        .await
    {
        tracing::warn!(post_id = post.id, error = %e, "Failed to remove post image");
    }

    tracing::info!(post_id = post.id, "Post deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// GET /uploads/{filename}
pub async fn image(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    serve_image(state.storage.as_ref(), POST_IMAGE_FOLDER, &path.into_inner()).await
}
