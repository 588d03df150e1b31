//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and provider traits
//! - `application/` - Identity resolver, session tokens, OAuth login flow
//! - `infra/` - PostgreSQL and in-memory stores, OAuth provider client
//! - `presentation/` - HTTP handlers, DTOs, authentication gate, router
//!
//! ## Features
//! - Local sign-up / sign-in with username + password
//! - OAuth2 authorization-code login (GitHub, Google)
//! - Stateless sessions: HS256 JWT in the `JWT` cookie
//! - One user per external key, created on first login
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Tokens accept HS256 only, zero leeway on expiry, fixed issuer
//! - OAuth `state` bound to an HMAC-signed, short-lived cookie
//! - Error bodies never carry provider or database detail

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, ProviderSettings};
pub use application::oauth_login::ProviderRegistry;
pub use application::session_token::SessionClaims;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryUserRepository;
pub use infra::oauth::{OAuthClient, ProviderSpec};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
