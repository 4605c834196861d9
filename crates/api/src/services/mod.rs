//! Application services.

pub mod auth;
pub mod bootstrap;

pub use auth::{AuthError, AuthService, LoginResult};
pub use bootstrap::{seed, BootstrapError, BootstrapReport};
