//! # Scribe Core
//!
//! Domain layer of the Scribe blogging backend: entities, errors, ports and
//! the authentication service. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ownership;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
