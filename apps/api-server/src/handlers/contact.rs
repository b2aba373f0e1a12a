//! Contact form submissions.

use actix_web::{HttpResponse, web};

use scribe_core::domain::NewContactMessage;
use scribe_shared::dto::ContactRequest;

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /contact-us
pub async fn submit(
    state: web::Data<AppState>,
    body: web::Json<ContactRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let message = NewContactMessage {
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        subject: req.subject.trim().to_string(),
        message: req.message,
    };
    message.validate()?;

    let saved = state.repos.contacts.insert(message).await?;
    tracing::info!(contact_id = saved.id, "Contact message received");

    Ok(HttpResponse::Ok().json(views::contact(saved)))
}
