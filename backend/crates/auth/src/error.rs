//! Errors raised by the authentication routes
//!
//! Each variant maps onto one [`ErrorKind`]; responses are produced by
//! converting into [`AppError`] so the error channel renders them.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or policy-violating client input
    #[error("{0}")]
    BadRequest(String),

    /// No session cookie on a gated request
    #[error("no session token")]
    MissingSessionToken,

    /// Signature, algorithm, issuer or structure mismatch
    #[error("invalid session token")]
    InvalidToken,

    /// Session token past its expiry
    #[error("session token expired")]
    ExpiredToken,

    /// Login rejected, whatever the cause
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// State cookie absent or not matching the callback
    #[error("invalid OAuth state")]
    InvalidOAuthState,

    #[error("User not found")]
    UserNotFound,

    /// No identity provider registered under this name
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A local account already uses this name
    #[error("User name already exists")]
    UserNameTaken,

    /// The store rejected an insert on a uniqueness constraint
    #[error("User already exists")]
    DuplicateUser,

    /// Token exchange or profile fetch against the provider failed
    #[error("provider exchange failed: {0}")]
    ProviderExchange(String),

    /// Provider client id/secret or endpoints unusable
    #[error("provider misconfigured: {0}")]
    ProviderConfig(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A fault the client cannot fix, such as a corrupt stored hash
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::BadRequest(_) => ErrorKind::BadRequest,
            AuthError::MissingSessionToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::InvalidCredentials
            | AuthError::InvalidOAuthState => ErrorKind::Unauthorized,
            AuthError::UserNotFound | AuthError::UnknownProvider(_) => ErrorKind::NotFound,
            AuthError::UserNameTaken | AuthError::DuplicateUser => ErrorKind::Conflict,
            AuthError::ProviderExchange(_) => ErrorKind::ProviderExchange,
            AuthError::ProviderConfig(_) => ErrorKind::ProviderConfig,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message placed in the response body
    ///
    /// Provider failures carry upstream detail that only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::ProviderExchange(_) => "OAuth provider exchange failed".to_string(),
            AuthError::ProviderConfig(_) => "OAuth provider is not configured".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError, keeping this error as the log-only source
    pub fn into_app_error(self) -> AppError {
        AppError::new(self.kind(), self.public_message()).with_source(self)
    }

    /// Server faults are logged at ERROR here; the channel adds a WARN line
    /// for every error response
    fn log(&self) {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                tracing::error!(error = %self, "Auth server fault");
            }
            AuthError::InvalidCredentials => tracing::debug!("Rejected login attempt"),
            _ => {}
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AuthError {
    fn from(rejection: QueryRejection) -> Self {
        AuthError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
