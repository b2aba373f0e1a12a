#![cfg(feature = "auth")]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use scribe_core::DomainError;
use scribe_core::domain::{DirectoryEntry, NewUser, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, TokenService, UserRepository};
use scribe_core::services::AuthService;
use scribe_infra::memory::InMemoryUserRepository;
use scribe_infra::{Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService};

fn token_service() -> Arc<JwtTokenService> {
    Arc::new(JwtTokenService::new(&JwtConfig::new(SecretString::from(
        "integration-secret".to_string(),
    ))))
}

fn service_with(users: Arc<dyn UserRepository>) -> AuthService {
    let passwords = Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap());
    AuthService::new(users, passwords, token_service())
}

fn service() -> AuthService {
    service_with(Arc::new(InMemoryDatabase::new().users()))
}

#[tokio::test]
async fn test_register_then_login() {
    let auth = service();

    let registered = auth.register("alice", "a@x.com", "secret123").await.unwrap();
    assert!(registered.user.id > 0);
    assert_ne!(registered.user.password_hash, "secret123");

    // Force a different iat.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let logged_in = auth.login("a@x.com", "secret123").await.unwrap();

    assert_ne!(
        logged_in.tokens.access_token,
        registered.tokens.access_token
    );
    let claims = auth.tokens().verify(&logged_in.tokens.access_token).unwrap();
    assert_eq!(claims.subject_id, registered.user.id);
    assert_eq!(claims.display_name, "alice");
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let auth = service();

    for (u, e, p) in [("", "a@x.com", "pw"), ("alice", " ", "pw"), ("alice", "a@x.com", "")] {
        let err = auth.register(u, e, p).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}

#[tokio::test]
async fn test_duplicate_username_or_email_conflicts() {
    let auth = service();
    auth.register("alice", "a@x.com", "pw1").await.unwrap();

    let same_name = auth.register("alice", "other@x.com", "pw2").await;
    let same_email = auth.register("bob", "a@x.com", "pw3").await;

    assert!(matches!(same_name, Err(DomainError::Duplicate(_))));
    assert!(matches!(same_email, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let auth = service();
    auth.register("alice", "a@x.com", "secret123").await.unwrap();

    let wrong_password = auth.login("a@x.com", "nope").await.unwrap_err();
    let unknown_email = auth.login("ghost@x.com", "secret123").await.unwrap_err();

    assert!(matches!(wrong_password, DomainError::InvalidCredentials));
    assert!(matches!(unknown_email, DomainError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_refresh_mints_access_token() {
    let auth = service();
    let session = auth.register("alice", "a@x.com", "pw").await.unwrap();

    let access = auth
        .refresh(Some(&session.tokens.refresh_token))
        .await
        .unwrap();
    let claims = auth.tokens().verify(&access).unwrap();

    assert_eq!(claims.subject_id, session.user.id);
    assert_eq!(
        (claims.expires_at - claims.issued_at).num_seconds(),
        auth.tokens().access_ttl().as_secs() as i64
    );
}

#[tokio::test]
async fn test_refresh_rejects_missing_and_invalid_tokens() {
    let auth = service();

    assert!(matches!(
        auth.refresh(None).await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        auth.refresh(Some("")).await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        auth.refresh(Some("garbage")).await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_refresh_rejects_expired_token() {
    let auth = service();
    let codec = token_service();
    let expired = codec
        .issue_at(
            chrono::Utc::now() - chrono::TimeDelta::days(8),
            1,
            "alice",
            codec.refresh_ttl(),
        )
        .unwrap();

    assert!(matches!(
        auth.refresh(Some(&expired)).await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_change_password() {
    let auth = service();
    auth.register("alice", "a@x.com", "old-pw").await.unwrap();

    let wrong_old = auth.change_password("a@x.com", "bad", "new-pw").await;
    let unknown = auth.change_password("ghost@x.com", "old-pw", "new-pw").await;
    let same = auth.change_password("a@x.com", "old-pw", "old-pw").await;
    assert!(matches!(wrong_old, Err(DomainError::InvalidCredentials)));
    assert!(matches!(unknown, Err(DomainError::InvalidCredentials)));
    assert!(matches!(same, Err(DomainError::Validation(_))));

    auth.change_password("a@x.com", "old-pw", "new-pw")
        .await
        .unwrap();

    assert!(auth.login("a@x.com", "old-pw").await.is_err());
    assert!(auth.login("a@x.com", "new-pw").await.is_ok());
}

/// Hides existing rows from the pre-insert lookups, like a concurrent
/// registration that has not committed yet.
struct BlindLookups(InMemoryUserRepository);

#[async_trait]
impl BaseRepository<User, i64> for BlindLookups {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.0.update(user).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl UserRepository for BlindLookups {
    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        self.0.insert(user).await
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, RepoError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, RepoError> {
        Ok(None)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        self.0.find_by_ids(ids).await
    }

    async fn directory(&self) -> Result<Vec<DirectoryEntry>, RepoError> {
        self.0.directory().await
    }

    async fn follow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError> {
        self.0.follow(follower_id, following_id).await
    }

    async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError> {
        self.0.unfollow(follower_id, following_id).await
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        self.0.followers(user_id).await
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        self.0.following(user_id).await
    }
}

#[tokio::test]
async fn test_insert_time_constraint_surfaces_as_conflict() {
    let auth = service_with(Arc::new(BlindLookups(InMemoryDatabase::new().users())));

    auth.register("alice", "a@x.com", "pw").await.unwrap();
    let raced = auth.register("alice", "a@x.com", "pw").await;

    assert!(matches!(raced, Err(DomainError::Duplicate(_))));
}
