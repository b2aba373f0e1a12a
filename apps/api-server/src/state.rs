//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{
    AlbumRepository, BookmarkRepository, CommentRepository, ContactRepository, FileStorage,
    PasswordService, PostRepository, ReactionRepository, TokenService, UserRepository,
};
use scribe_core::services::AuthService;
use scribe_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService, LocalFileStorage};

#[cfg(feature = "postgres")]
use scribe_infra::database::{
    DbPool, PostgresAlbumRepository, PostgresBookmarkRepository, PostgresCommentRepository,
    PostgresContactRepository, PostgresPostRepository, PostgresReactionRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;
use crate::middleware::auth::TokenSource;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(String),

    #[error("migration failed: {0}")]
    Migration(String),
}

/// HTTP-facing settings read by handlers and the gate.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub token_sources: Vec<TokenSource>,
    pub cookie_secure: bool,
    pub cookie_domain: Option<String>,
    /// Prefix of public image URLs, without a trailing slash.
    pub public_base_url: String,
    pub upload_max_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            token_sources: TokenSource::default_order(),
            cookie_secure: false,
            cookie_domain: None,
            public_base_url: "http://localhost:8000".to_string(),
            upload_max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// One handle per persisted resource.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub reactions: Arc<dyn ReactionRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
    pub albums: Arc<dyn AlbumRepository>,
    pub contacts: Arc<dyn ContactRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let db = InMemoryDatabase::new();
        Self {
            users: Arc::new(db.users()),
            posts: Arc::new(db.posts()),
            comments: Arc::new(db.comments()),
            reactions: Arc::new(db.reactions()),
            bookmarks: Arc::new(db.bookmarks()),
            albums: Arc::new(db.albums()),
            contacts: Arc::new(db.contacts()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(pool: &DbPool) -> Self {
        let conn = || pool.main.clone();
        Self {
            users: Arc::new(PostgresUserRepository::new(conn())),
            posts: Arc::new(PostgresPostRepository::new(conn())),
            comments: Arc::new(PostgresCommentRepository::new(conn())),
            reactions: Arc::new(PostgresReactionRepository::new(conn())),
            bookmarks: Arc::new(PostgresBookmarkRepository::new(conn())),
            albums: Arc::new(PostgresAlbumRepository::new(conn())),
            contacts: Arc::new(PostgresContactRepository::new(conn())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub auth: AuthService,
    pub storage: Arc<dyn FileStorage>,
    pub http: Arc<HttpSettings>,
    #[cfg(feature = "postgres")]
    pub db: Option<DbPool>,
}

impl AppState {
    /// Wire the state from configuration. A configured but unreachable database is fatal.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        #[cfg(feature = "postgres")]
        let (repos, db) = match &config.database {
            Some(db_config) => {
                let pool = DbPool::connect(db_config)
                    .await
                    .map_err(|e| StartupError::Database(e.to_string()))?;

                if config.auto_migrate {
                    use migration::MigratorTrait;

                    migration::Migrator::up(&pool.main, None)
                        .await
                        .map_err(|e| StartupError::Migration(e.to_string()))?;
                    tracing::info!("Database migrations applied");
                }

                (Repositories::postgres(&pool), Some(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running with in-memory repositories.");
                (Repositories::in_memory(), None)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            if config.auto_migrate {
                tracing::warn!("DB_AUTO_MIGRATE ignored: built without postgres support");
            }
            tracing::warn!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(&config.jwt));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(&config.upload_dir));

        #[allow(unused_mut)]
        let mut state = Self::assemble(repos, tokens, passwords, storage, config.http.clone());
        #[cfg(feature = "postgres")]
        {
            state.db = db;
        }

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Build a state from explicit parts, without a database handle.
    pub fn assemble(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        storage: Arc<dyn FileStorage>,
        http: HttpSettings,
    ) -> Self {
        let auth = AuthService::new(repos.users.clone(), passwords, tokens);
        Self {
            repos,
            auth,
            storage,
            http: Arc::new(http),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenService> {
        self.auth.tokens()
    }

    /// Readiness of the backing store; always ready on in-memory repositories.
    pub async fn ready(&self) -> Result<(), String> {
        #[cfg(feature = "postgres")]
        if let Some(pool) = &self.db {
            return pool.ping().await.map_err(|e| e.to_string());
        }
        Ok(())
    }
}
