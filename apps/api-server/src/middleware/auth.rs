//! Authorization gate: token extraction, verification and the `Identity` extractor.

use std::collections::HashMap;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
    web,
};

use scribe_core::ports::{TokenClaims, TokenService};
use scribe_shared::{ErrorCode, ErrorResponse};

use super::error::AppError;

/// Cookie carrying the refresh token; also accepted as an access token source.
pub const REFRESH_COOKIE: &str = "refresh_token";

const QUERY_PARAM: &str = "token";

/// Verified identity of the caller, available to handlers behind the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: i64,
    pub display_name: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject_id: claims.subject_id,
            display_name: claims.display_name,
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or_else(AppError::unauthorized),
        )
    }
}

/// Where a bearer token may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer <token>`
    Header,
    /// The `refresh_token` cookie.
    Cookie,
    /// The `token` query parameter.
    Query,
}

impl TokenSource {
    pub fn default_order() -> Vec<TokenSource> {
        vec![TokenSource::Header, TokenSource::Cookie, TokenSource::Query]
    }

    /// Parse a comma-separated list such as `header,cookie`.
    pub fn parse_list(raw: &str) -> Result<Vec<TokenSource>, String> {
        let sources = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if sources.is_empty() {
            return Err("at least one token source is required".to_string());
        }
        Ok(sources)
    }

    fn find(self, req: &HttpRequest) -> Option<String> {
        let raw = match self {
            TokenSource::Header => {
                let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
                value.strip_prefix("Bearer ").unwrap_or(value).to_string()
            }
            TokenSource::Cookie => req.cookie(REFRESH_COOKIE)?.value().to_string(),
            TokenSource::Query => {
                web::Query::<HashMap<String, String>>::from_query(req.query_string())
                    .ok()?
                    .into_inner()
                    .remove(QUERY_PARAM)?
            }
        };

        let token = raw.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

impl FromStr for TokenSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "header" => Ok(TokenSource::Header),
            "cookie" => Ok(TokenSource::Cookie),
            "query" => Ok(TokenSource::Query),
            other => Err(format!("unknown token source '{other}'")),
        }
    }
}

/// Walks the configured sources in order; the first non-empty token wins.
#[derive(Debug, Clone)]
pub struct TokenExtractor {
    sources: Arc<[TokenSource]>,
}

impl TokenExtractor {
    pub fn new(sources: &[TokenSource]) -> Self {
        Self {
            sources: sources.into(),
        }
    }

    pub fn extract(&self, req: &HttpRequest) -> Option<String> {
        self.sources.iter().find_map(|source| source.find(req))
    }
}

/// Authorization gate middleware factory.
pub struct AuthGate {
    tokens: Arc<dyn TokenService>,
    extractor: TokenExtractor,
}

impl AuthGate {
    pub fn new(tokens: Arc<dyn TokenService>, extractor: TokenExtractor) -> Self {
        Self { tokens, extractor }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service,
            tokens: self.tokens.clone(),
            extractor: self.extractor.clone(),
        }))
    }
}

pub struct AuthGateService<S> {
    service: S,
    tokens: Arc<dyn TokenService>,
    extractor: TokenExtractor,
}

impl<S> AuthGateService<S> {
    fn authenticate(&self, req: &HttpRequest) -> Result<Identity, &'static str> {
        let token = self
            .extractor
            .extract(req)
            .ok_or("missing authentication token")?;

        // The failure kind stays in the logs.
        let claims = self.tokens.verify(&token).map_err(|e| {
            tracing::debug!(reason = %e, path = req.path(), "Access token rejected");
            "invalid or expired token"
        })?;
        tracing::debug!(
            subject_id = claims.subject_id,
            token_id = %claims.token_id,
            "Access token accepted"
        );

        Ok(Identity::from(claims))
    }
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(req.request()) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(message) => {
                let response = HttpResponse::Unauthorized()
                    .json(ErrorResponse::new(ErrorCode::Unauthorized, message));

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                Box::pin(async move { Ok(srv_response.map_into_right_body()) })
            }
        }
    }
}
