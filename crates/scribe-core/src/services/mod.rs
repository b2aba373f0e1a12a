//! Application services orchestrating the ports.

mod auth;

pub use auth::{AuthService, AuthSession};
