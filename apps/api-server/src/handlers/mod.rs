//! HTTP handlers and route configuration.

mod albums;
mod auth;
mod bookmarks;
mod comments;
mod contact;
mod health;
mod posts;
mod reactions;
mod upload;
mod users;
mod views;

use actix_web::web;

pub use upload::MAX_TEXT_BYTES;

use crate::middleware::auth::{AuthGate, TokenExtractor};
use crate::state::AppState;

/// Public routes first; everything else sits behind the authorization gate.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/refresh", web::post().to(auth::refresh))
        .route("/logout", web::post().to(auth::logout))
        .route("/verifyemail/{email}", web::get().to(auth::verify_email))
        .route("/reset-password", web::put().to(auth::reset_password))
        .route("/health", web::get().to(health::health_check))
        .route("/live", web::get().to(health::live))
        .route("/ready", web::get().to(health::ready));

    let gate = AuthGate::new(
        state.tokens().clone(),
        TokenExtractor::new(&state.http.token_sources),
    );

    cfg.service(
        web::scope("")
            .wrap(gate)
            // Users
            .route("/users", web::get().to(users::me))
            .route(
                "/users/uploads/avatars/{filename}",
                web::get().to(users::avatar_image),
            )
            .route("/users/follow/{id}", web::post().to(users::follow))
            .route("/users/unfollow/{id}", web::delete().to(users::unfollow))
            .route("/users/{username}", web::get().to(users::profile))
            .route("/users/{id}", web::put().to(users::update))
            .route("/users/{id}/avatar", web::post().to(users::upload_avatar))
            .route("/users/{id}/followers", web::get().to(users::followers))
            .route("/users/{id}/following", web::get().to(users::following))
            .route("/users/{id}/posts", web::get().to(posts::by_user))
            .route("/users-emails", web::get().to(users::directory))
            // Reactions
            .route("/posts/{id}/like", web::post().to(reactions::like))
            .route("/posts/{id}/dislike", web::post().to(reactions::dislike))
            .route("/posts/{id}/reaction", web::delete().to(reactions::remove))
            .route("/posts/{id}/reactions", web::get().to(reactions::summary))
            // Comments
            .route("/posts/{id}/comments", web::post().to(comments::create))
            .route("/posts/{id}/comments", web::get().to(comments::list))
            .route("/comments/{id}", web::put().to(comments::update))
            .route("/comments/{id}", web::delete().to(comments::delete))
            // Bookmarks
            .route("/posts/{id}/bookmark", web::post().to(bookmarks::toggle_bookmark))
            .route("/posts/{id}/bookmarks/count", web::get().to(bookmarks::count))
            .route("/bookmarks", web::get().to(bookmarks::list))
            // Albums
            .route("/albums", web::get().to(albums::list))
            .route("/albums", web::post().to(albums::create))
            .route("/albums/{id}", web::get().to(albums::get))
            .route("/albums/{id}", web::put().to(albums::update))
            .route("/albums/{id}", web::delete().to(albums::delete))
            // Contact
            .route("/contact-us", web::post().to(contact::submit))
            // Posts; the two-segment slug route must stay last.
            .route("/posts", web::get().to(posts::list))
            .route("/posts", web::post().to(posts::create))
            .route("/posts/{id}", web::put().to(posts::update))
            .route("/posts/{id}", web::delete().to(posts::delete))
            .route("/uploads/{filename}", web::get().to(posts::image))
            .route("/posts/{username}/{slug}", web::get().to(posts::by_slug)),
    );
}
