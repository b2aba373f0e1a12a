//! # Scribe API Server
//!
//! actix-web application: configuration, state, the authorization gate and
//! the REST handlers. The binary in `main.rs` only wires these together.

pub mod config;
pub mod cors;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

use actix_web::web;

use scribe_core::DomainError;

use crate::middleware::error::AppError;
use crate::state::AppState;

fn bad_input(detail: String) -> actix_web::Error {
    AppError::from(DomainError::Validation(detail)).into()
}

/// Register state, extractor error handlers and every route.
pub fn configure_app(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state.clone())
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| bad_input(format!("invalid JSON body: {err}"))),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|err, _req| bad_input(format!("invalid path: {err}"))),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| bad_input(format!("invalid query: {err}"))),
            );

        handlers::configure_routes(cfg, &state);
    }
}
