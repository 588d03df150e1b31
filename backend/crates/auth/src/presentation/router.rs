//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use kernel::error::app_error::AppError;
use kernel::error::channel::error_channel;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::oauth_login::ProviderRegistry;
use crate::application::oauth_state::OAuthStateGuard;
use crate::application::session_token::SessionTokenService;
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::UserRepository;
use crate::infra::oauth::OAuthClient;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{SessionGate, require_session};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(
    repo: PgUserRepository,
    providers: ProviderRegistry<OAuthClient>,
    config: AuthConfig,
) -> Router {
    auth_router_generic(repo, providers, config)
}

/// Create a generic Auth router for any repository and provider implementation
///
/// The error channel is the outermost layer; anything layered on top by the
/// caller (CORS, tracing) sees the rendered error response. Unknown paths and
/// unsupported methods are reported as 404 through the same channel.
pub fn auth_router_generic<R, P>(repo: R, providers: ProviderRegistry<P>, config: AuthConfig) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let config = Arc::new(config);
    let tokens = Arc::new(SessionTokenService::new(&config));

    let state = AuthAppState {
        repo: Arc::new(repo),
        config: config.clone(),
        providers: Arc::new(providers),
        tokens: tokens.clone(),
        state_guard: Arc::new(OAuthStateGuard::new(&config)),
    };

    let gate = SessionGate { tokens, config };

    let gated = Router::new()
        .route("/me", get(handlers::me::<R, P>))
        .route("/users/{id}", get(handlers::get_user::<R, P>))
        .route_layer(middleware::from_fn_with_state(gate, require_session));

    Router::new()
        .route("/register", post(handlers::register::<R, P>))
        .route("/login", post(handlers::login::<R, P>))
        .route("/logout", post(handlers::logout::<R, P>))
        .route("/auth/{provider}/login", get(handlers::oauth_login::<R, P>))
        .route(
            "/auth/{provider}/callback",
            get(handlers::oauth_callback::<R, P>),
        )
        .merge(gated)
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .with_state(state)
        .layer(middleware::from_fn(error_channel))
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}
