//! HTTP Handlers
//!
//! 失敗はすべて `AuthError` として返し、レスポンス本文は書かない。
//! 本文の生成は最外層の error channel が一度だけ行う。

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::identity_resolver::IdentityResolver;
use crate::application::oauth_login::{CallbackInput, OAuthLoginUseCase, ProviderRegistry};
use crate::application::oauth_state::OAuthStateGuard;
use crate::application::session_token::{SessionClaims, SessionIdentity, SessionTokenService};
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CallbackQuery, LoginRequest, RegisterRequest, RegisterResponse, UserResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, P> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub providers: Arc<ProviderRegistry<P>>,
    pub tokens: Arc<SessionTokenService>,
    pub state_guard: Arc<OAuthStateGuard>,
}

// Manual impl: the derive would require `R: Clone` and `P: Clone`.
impl<R, P> Clone for AuthAppState<R, P> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            providers: self.providers.clone(),
            tokens: self.tokens.clone(),
            state_guard: self.state_guard.clone(),
        }
    }
}

impl<R, P> AuthAppState<R, P>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    fn resolver(&self) -> IdentityResolver<R> {
        IdentityResolver::new(self.repo.clone(), self.config.clone())
    }

    fn oauth_login(&self) -> OAuthLoginUseCase<R, P> {
        OAuthLoginUseCase::new(
            self.repo.clone(),
            self.config.clone(),
            self.providers.clone(),
            self.tokens.clone(),
            self.state_guard.clone(),
        )
    }
}

// ============================================================================
// Local Accounts
// ============================================================================

/// POST /register
pub async fn register<R, P>(
    State(state): State<AuthAppState<R, P>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<Json<RegisterResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let user = state
        .resolver()
        .register_local_user(&req.username, req.password)
        .await?;

    Ok(Json(RegisterResponse::from(&user)))
}

/// POST /login
pub async fn login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let user = state
        .resolver()
        .authenticate_local_user(&req.username, req.password)
        .await?;
    let session = state.tokens.issue(SessionIdentity::from(&user))?;

    let cookie = state.config.session_cookie().build_set_cookie(&session.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(session.claims),
    ))
}

/// POST /logout
///
/// Tokens are not tracked server-side; logging out only clears the cookie.
pub async fn logout<R, P>(State(state): State<AuthAppState<R, P>>) -> impl IntoResponse {
    let cookie = state.config.session_cookie().build_delete_cookie();
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// OAuth
// ============================================================================

/// GET /auth/{provider}/login
pub async fn oauth_login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Path(provider): Path<String>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let redirect = state.oauth_login().begin(&provider)?;

    let state_cookie = state
        .config
        .oauth_state_cookie()
        .build_set_cookie(&redirect.state_cookie_value);

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, redirect.authorization_url),
            (header::SET_COOKIE, state_cookie),
        ],
    ))
}

/// GET /auth/{provider}/callback?code=…&state=…
pub async fn oauth_callback<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let Query(query) = query?;

    let input = CallbackInput {
        code: query.code,
        state: query.state,
        state_cookie: platform::cookie::extract_cookie(
            &headers,
            &state.config.oauth_state_cookie_name,
        ),
    };

    let session = state.oauth_login().complete(&provider, input).await?;

    let session_cookie = state.config.session_cookie().build_set_cookie(&session.token);
    let clear_state = state.config.oauth_state_cookie().build_delete_cookie();

    Ok((
        StatusCode::OK,
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, clear_state),
        ]),
        Json(session.claims),
    ))
}

// ============================================================================
// Gated
// ============================================================================

/// GET /me
pub async fn me<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(claims): Extension<SessionClaims>,
) -> AuthResult<Json<SessionClaims>>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let user_id: UserId = claims
        .identity
        .user_id
        .parse()
        .map_err(|_| AuthError::InvalidToken)?;

    // 署名が有効でもユーザーが存在しなければセッションとして扱わない
    if !state.resolver().check_user_exists(&user_id).await? {
        tracing::debug!(user_id = %user_id, "Session refers to a missing user");
        return Err(AuthError::InvalidToken);
    }

    Ok(Json(claims))
}

/// GET /users/{id}
pub async fn get_user<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let user_id: UserId = id
        .parse()
        .map_err(|_| AuthError::BadRequest("invalid user id".to_string()))?;

    let user = state.resolver().get_user_by_id(&user_id).await?;

    Ok(Json(UserResponse::from(&user)))
}
