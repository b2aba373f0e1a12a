use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Connection settings for the main database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Pooled connection to the main database.
// sea-orm's `mock` feature drops `Clone` from `DbConn`.
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct DbPool {
    pub main: DbConn,
}

impl DbPool {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection pool...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!(pool = config.max_connections, "Main database connected");

        Ok(Self { main })
    }

    /// Round-trip to the server; used by the readiness check.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.main.ping().await
    }
}
