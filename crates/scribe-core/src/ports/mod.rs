//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, SessionTokens, TokenClaims, TokenService};
pub use repository::{
    AlbumRepository, BaseRepository, BookmarkRepository, CommentRepository, ContactRepository,
    PostRepository, ReactionRepository, UserRepository,
};
pub use storage::{FileStorage, StorageError};
