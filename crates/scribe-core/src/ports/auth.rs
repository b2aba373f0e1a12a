//! Authentication ports: token codec and password hasher.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Verified identity claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject_id: i64,
    pub display_name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Unique token identifier.
    pub token_id: String,
}

/// Access/refresh token pair handed to a client after login.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies signed, time-limited tokens.
pub trait TokenService: Send + Sync {
    /// Sign a token for `subject_id` that expires after `ttl`.
    fn issue(&self, subject_id: i64, display_name: &str, ttl: Duration)
    -> Result<String, AuthError>;

    /// Check signature and expiry and decode the claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    fn access_ttl(&self) -> Duration;

    fn refresh_ttl(&self) -> Duration;

    /// Mint a short-lived access token and a long-lived refresh token.
    fn issue_session(
        &self,
        subject_id: i64,
        display_name: &str,
    ) -> Result<SessionTokens, AuthError> {
        Ok(SessionTokens {
            access_token: self.issue(subject_id, display_name, self.access_ttl())?,
            refresh_token: self.issue(subject_id, display_name, self.refresh_ttl())?,
        })
    }
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Token codec and hasher failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Token signature mismatch")]
    SignatureMismatch,

    #[error("Token expired")]
    Expired,

    #[error("Token lifetime must be at least one second")]
    InvalidTtl,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    Hashing(String),
}
