//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT + Argon2 authentication
//!
//! In-memory repositories and file storage are always available.

pub mod memory;
pub mod storage;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use memory::InMemoryDatabase;
pub use storage::{InMemoryFileStorage, LocalFileStorage};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DbPool};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
