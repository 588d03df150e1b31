//! Auth Middleware
//!
//! Authentication gate for protected routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenService;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct SessionGate {
    pub tokens: Arc<SessionTokenService>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid session token
///
/// On success the verified [`SessionClaims`](crate::application::SessionClaims)
/// are inserted into the request extensions. On failure the wrapped handler
/// is not called and the error is reported to the error channel.
pub async fn require_session(
    State(gate): State<SessionGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = platform::cookie::extract_cookie(req.headers(), &gate.config.session_cookie_name)
        .ok_or(AuthError::MissingSessionToken)?;

    let claims = gate.tokens.verify(&token)?;

    tracing::debug!(user_id = %claims.identity.user_id, "Session verified");

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
