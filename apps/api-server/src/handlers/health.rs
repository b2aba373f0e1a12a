//! Health, liveness and readiness endpoints.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use scribe_shared::{ErrorCode, ErrorResponse};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /live
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "alive" }))
}

/// GET /ready - 503 while the database is unreachable.
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    match state.ready().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ready" })),
        Err(detail) => {
            tracing::warn!(%detail, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                ErrorCode::StorageError,
                "database unavailable",
            ))
        }
    }
}
