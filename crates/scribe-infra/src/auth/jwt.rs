//! JWT token codec.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scribe_core::ports::{AuthError, TokenClaims, TokenService};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token codec configuration, built once at startup.
#[derive(Debug)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl JwtConfig {
    /// One-hour access tokens and seven-day refresh tokens.
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            issuer: "scribe-api".to_string(),
            access_ttl: Duration::from_secs(60 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

/// Wire format of the token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    iat: i64,
    exp: i64,
    iss: String,
    jti: String,
}

/// HS256 JWT codec.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        // Expiry is checked in `verify_at` with zero leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: config.issuer.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub fn issue_at(
        &self,
        now: DateTime<Utc>,
        subject_id: i64,
        display_name: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| AuthError::InvalidTtl)?;
        if ttl_secs < 1 {
            return Err(AuthError::InvalidTtl);
        }

        let iat = now.timestamp();
        let claims = Claims {
            sub: subject_id.to_string(),
            name: display_name.to_string(),
            iat,
            exp: iat.checked_add(ttl_secs).ok_or(AuthError::InvalidTtl)?,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::SignatureMismatch
                }
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::MalformedToken,
            }
        })?;
        let claims = data.claims;

        let subject_id: i64 = claims.sub.parse().map_err(|_| AuthError::MalformedToken)?;
        if claims.exp <= claims.iat {
            return Err(AuthError::MalformedToken);
        }
        let issued_at =
            DateTime::from_timestamp(claims.iat, 0).ok_or(AuthError::MalformedToken)?;
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::MalformedToken)?;

        if now >= expires_at {
            return Err(AuthError::Expired);
        }

        Ok(TokenClaims {
            subject_id,
            display_name: claims.name,
            issued_at,
            expires_at,
            token_id: claims.jti,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(
        &self,
        subject_id: i64,
        display_name: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        self.issue_at(Utc::now(), subject_id, display_name, ttl)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
