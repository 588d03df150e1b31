//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod identity_resolver;
pub mod oauth_login;
pub mod oauth_state;
pub mod session_token;

// Re-exports
pub use config::{AuthConfig, ProviderSettings};
pub use identity_resolver::IdentityResolver;
pub use oauth_login::{CallbackInput, LoginRedirect, OAuthLoginUseCase, ProviderRegistry};
pub use oauth_state::OAuthStateGuard;
pub use session_token::{IssuedSession, SessionClaims, SessionIdentity, SessionTokenService};
