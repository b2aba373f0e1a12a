//! SeaORM entities, one per table.

pub mod album;
pub mod bookmark;
pub mod comment;
pub mod contact;
pub mod follow;
pub mod post;
pub mod reaction;
pub mod user;
