//! Registration, login, token refresh and password reset.

use std::time::Duration;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse, web};

use scribe_core::services::AuthSession;
use scribe_shared::MessageResponse;
use scribe_shared::dto::{
    AuthResponse, LoginRequest, RefreshResponse, RegisterUserRequest, ResetPasswordRequest,
};

use super::views;
use crate::middleware::auth::REFRESH_COOKIE;
use crate::middleware::error::{AppError, AppResult};
use crate::state::{AppState, HttpSettings};

fn refresh_cookie(settings: &HttpSettings, token: String, ttl: Duration) -> Cookie<'static> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

    let mut cookie = Cookie::build(REFRESH_COOKIE, token)
        .path("/")
        .secure(settings.cookie_secure)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(max_age))
        .finish();

    if let Some(ref domain) = settings.cookie_domain {
        cookie.set_domain(domain.clone());
    }

    cookie
}

fn removal_cookie(settings: &HttpSettings) -> Cookie<'static> {
    let mut cookie = Cookie::build(REFRESH_COOKIE, String::new())
        .path("/")
        .secure(settings.cookie_secure)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::ZERO)
        .finish();

    if let Some(ref domain) = settings.cookie_domain {
        cookie.set_domain(domain.clone());
    }

    cookie
}

fn session_response(
    state: &AppState,
    mut response: actix_web::HttpResponseBuilder,
    message: &str,
    session: AuthSession,
) -> HttpResponse {
    let cookie = refresh_cookie(
        &state.http,
        session.tokens.refresh_token.clone(),
        state.tokens().refresh_ttl(),
    );

    response.cookie(cookie).json(AuthResponse {
        message: message.to_string(),
        user: views::user(session.user),
        access_token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
    })
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .auth
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(session_response(
        &state,
        HttpResponse::Created(),
        "User registered successfully",
        session,
    ))
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.auth.login(&req.email, &req.password).await?;

    Ok(session_response(
        &state,
        HttpResponse::Ok(),
        "Login successful",
        session,
    ))
}

/// POST /refresh - mints an access token from the `refresh_token` cookie.
pub async fn refresh(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let cookie = req.cookie(REFRESH_COOKIE);
    let access_token = state.auth.refresh(cookie.as_ref().map(|c| c.value())).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse { access_token }))
}

/// POST /logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie(&state.http))
        .json(MessageResponse::new("Logged out successfully"))
}

/// GET /verifyemail/{email}
pub async fn verify_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let email = path.into_inner();

    match state.repos.users.find_by_email(email.trim()).await? {
        Some(_) => Ok(HttpResponse::Ok().json(MessageResponse::new("Email found"))),
        None => Err(AppError::not_found("email", email)),
    }
}

/// PUT /reset-password
pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    state
        .auth
        .change_password(&req.email, &req.old_password, &req.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password updated successfully")))
}
