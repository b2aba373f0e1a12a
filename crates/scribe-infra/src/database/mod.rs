//! PostgreSQL persistence via SeaORM.

mod connections;
pub mod entity;
mod postgres_base;
mod postgres_repo;

pub use connections::{DatabaseConfig, DbPool};
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{
    PostgresAlbumRepository, PostgresBookmarkRepository, PostgresCommentRepository,
    PostgresContactRepository, PostgresPostRepository, PostgresReactionRepository,
    PostgresUserRepository,
};

#[cfg(all(test, feature = "mock"))]
mod tests;
