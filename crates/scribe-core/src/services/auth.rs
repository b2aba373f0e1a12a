//! Registration, login and token refresh.

use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, SessionTokens, TokenService, UserRepository};

/// A user together with a freshly minted token pair.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: SessionTokens,
}

/// Credential orchestration over the user store, the hasher and the token codec.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenService> {
        &self.tokens
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, DomainError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "username, email and password are required".to_string(),
            ));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate("username already exists".to_string()));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Duplicate("email already exists".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;

        // The unique indexes settle concurrent registrations that both passed the checks above.
        let user = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => {
                    DomainError::Duplicate("username or email already exists".to_string())
                }
                other => other.into(),
            })?;

        let tokens = self.tokens.issue_session(user.id, &user.username)?;
        tracing::info!(user_id = user.id, "user registered");

        Ok(AuthSession { user, tokens })
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let user = self.check_credentials(email, password).await?;
        let tokens = self.tokens.issue_session(user.id, &user.username)?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok(AuthSession { user, tokens })
    }

    /// Mint a new access token from a refresh token.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<String, DomainError> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(DomainError::Unauthorized)?;

        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(reason = %e, "refresh token rejected");
            DomainError::Unauthorized
        })?;

        let access = self.tokens.issue(
            claims.subject_id,
            &claims.display_name,
            self.tokens.access_ttl(),
        )?;
        Ok(access)
    }

    pub async fn change_password(
        &self,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<User, DomainError> {
        if email.trim().is_empty() || old_password.is_empty() || new_password.is_empty() {
            return Err(DomainError::Validation(
                "email, old_password and new_password are required".to_string(),
            ));
        }

        let mut user = self.check_credentials(email, old_password).await?;
        if old_password == new_password {
            return Err(DomainError::Validation(
                "new password must differ from the old one".to_string(),
            ));
        }

        user.password_hash = self.passwords.hash(new_password)?;
        user.updated_at = chrono::Utc::now();
        let user = self.users.update(user).await?;
        tracing::info!(user_id = user.id, "password changed");

        Ok(user)
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            tracing::debug!("login attempt for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MalformedToken | AuthError::SignatureMismatch | AuthError::Expired => {
                DomainError::Unauthorized
            }
            AuthError::InvalidTtl | AuthError::Signing(_) | AuthError::Hashing(_) => {
                DomainError::Internal(err.to_string())
            }
        }
    }
}
