//! Application configuration loaded from secrets files and environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use scribe_infra::JwtConfig;
#[cfg(feature = "postgres")]
use scribe_infra::database::DatabaseConfig;

use crate::middleware::auth::TokenSource;
use crate::state::HttpSettings;

const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Looks a key up in `<dir>/<KEY>` (KEY=VALUE lines), then in the environment.
#[derive(Debug, Clone)]
pub struct SecretSource {
    dir: PathBuf,
}

impl SecretSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `SECRETS_DIR`, defaulting to `/run/secrets`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("SECRETS_DIR").unwrap_or_else(|_| DEFAULT_SECRETS_DIR.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        read_secret_file(&self.dir.join(key), key)
            .or_else(|| std::env::var(key).ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

fn read_secret_file(path: &Path, key: &str) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;

    contents
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().to_string())
}

/// Application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub auto_migrate: bool,
    pub jwt: JwtConfig,
    pub http: HttpSettings,
    pub cors_origins: Vec<String>,
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&SecretSource::from_env())
    }

    pub fn load(source: &SecretSource) -> Result<Self, ConfigError> {
        let secret = source
            .get("JWT_SECRET_KEY")
            .ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        let mut jwt = JwtConfig::new(SecretString::from(secret));
        if let Some(issuer) = source.get("JWT_ISSUER") {
            jwt.issuer = issuer;
        }
        jwt.access_ttl = Duration::from_secs(source.parse("JWT_ACCESS_TTL_SECS", 3600)?);
        jwt.refresh_ttl = Duration::from_secs(source.parse("JWT_REFRESH_TTL_SECS", 604_800)?);

        #[cfg(feature = "postgres")]
        let database = match source.get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: source.parse("DB_MAX_CONNECTIONS", 100)?,
                min_connections: source.parse("DB_MIN_CONNECTIONS", 10)?,
            }),
            None => None,
        };

        let token_sources = match source.get("AUTH_TOKEN_SOURCES") {
            Some(raw) => TokenSource::parse_list(&raw).map_err(|reason| ConfigError::Invalid {
                key: "AUTH_TOKEN_SOURCES",
                reason,
            })?,
            None => TokenSource::default_order(),
        };

        let defaults = HttpSettings::default();
        let http = HttpSettings {
            token_sources,
            cookie_secure: source.parse("REFRESH_COOKIE_SECURE", false)?,
            cookie_domain: source.get("REFRESH_COOKIE_DOMAIN"),
            public_base_url: source
                .get("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            upload_max_bytes: source.parse("UPLOAD_MAX_BYTES", defaults.upload_max_bytes)?,
        };

        let cors_origins = source
            .get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost,http://localhost:3000".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            host: source.get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: source.parse("PORT", 8000)?,
            #[cfg(feature = "postgres")]
            database,
            auto_migrate: source.parse("DB_AUTO_MIGRATE", false)?,
            jwt,
            http,
            cors_origins,
            upload_dir: PathBuf::from(
                source
                    .get("UPLOAD_DIR")
                    .unwrap_or_else(|| "./uploads".to_string()),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn empty_dir() -> SecretSource {
        SecretSource::new(std::env::temp_dir().join("scribe-no-such-secrets-dir"))
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        temp_env::with_var_unset("JWT_SECRET_KEY", || {
            let err = AppConfig::load(&empty_dir()).unwrap_err();
            assert!(matches!(err, ConfigError::Missing("JWT_SECRET_KEY")));
        });
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("JWT_SECRET_KEY", Some("s3cret")),
                ("PORT", None),
                ("HOST", None),
                ("AUTH_TOKEN_SOURCES", None),
                ("CORS_ALLOWED_ORIGINS", None),
                ("JWT_ACCESS_TTL_SECS", None),
                ("JWT_REFRESH_TTL_SECS", None),
            ],
            || {
                let config = AppConfig::load(&empty_dir()).unwrap();

                assert_eq!(config.port, 8000);
                assert_eq!(config.host, "127.0.0.1");
                assert_eq!(config.jwt.secret.expose_secret(), "s3cret");
                assert_eq!(config.jwt.access_ttl, Duration::from_secs(3600));
                assert_eq!(config.jwt.refresh_ttl, Duration::from_secs(604_800));
                assert_eq!(config.http.token_sources, TokenSource::default_order());
                assert_eq!(
                    config.cors_origins,
                    vec!["http://localhost", "http://localhost:3000"]
                );
            },
        );
    }

    #[test]
    fn test_invalid_number_is_reported() {
        temp_env::with_vars(
            [("JWT_SECRET_KEY", Some("s3cret")), ("PORT", Some("eighty"))],
            || {
                let err = AppConfig::load(&empty_dir()).unwrap_err();
                assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
            },
        );
    }

    #[test]
    fn test_token_sources_override() {
        temp_env::with_vars(
            [
                ("JWT_SECRET_KEY", Some("s3cret")),
                ("AUTH_TOKEN_SOURCES", Some("header")),
            ],
            || {
                let config = AppConfig::load(&empty_dir()).unwrap();
                assert_eq!(config.http.token_sources, vec![TokenSource::Header]);
            },
        );
    }

    #[test]
    fn test_secrets_file_wins_over_env() {
        let dir = std::env::temp_dir().join(format!("scribe-secrets-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("JWT_SECRET_KEY"),
            "# mounted secret\n\nOTHER=1\nJWT_SECRET_KEY = from-file\n",
        )
        .unwrap();

        temp_env::with_var("JWT_SECRET_KEY", Some("from-env"), || {
            let source = SecretSource::new(&dir);
            assert_eq!(source.get("JWT_SECRET_KEY").as_deref(), Some("from-file"));
        });

        fs::remove_dir_all(&dir).unwrap();
    }
}
