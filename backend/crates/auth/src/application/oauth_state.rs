//! OAuth State Guard
//!
//! Anti-forgery protection for the authorization-code round trip. The login
//! redirect generates a random `state` and stores it in a short-lived cookie
//! bound to the provider:
//!
//! ```text
//! <provider>.<state>.<issued_at>.<base64url(HMAC-SHA256)>
//! ```
//!
//! The callback accepts the `state` query parameter only when the cookie is
//! present, carries a valid signature, names the same provider, has not
//! expired, and holds the same state.

use chrono::Utc;
use platform::crypto::{
    constant_time_eq, from_base64_url, hmac_sha256, random_token, to_base64_url,
};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Random bytes per state token
const STATE_BYTES: usize = 32;

/// A freshly generated state and the cookie value that proves it
#[derive(Debug, Clone)]
pub struct IssuedState {
    /// Goes into the authorization URL
    pub state: String,
    /// Goes into the `oauth_state` cookie
    pub cookie_value: String,
}

pub struct OAuthStateGuard {
    key: [u8; 32],
    ttl_secs: i64,
}

impl OAuthStateGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            // Derived from the session secret; used for state cookies only.
            key: hmac_sha256(&config.session_secret, b"oauth-state-v1"),
            ttl_secs: config.oauth_state_ttl_secs(),
        }
    }

    pub fn issue(&self, provider: &str) -> IssuedState {
        self.issue_at(provider, Utc::now().timestamp())
    }

    fn issue_at(&self, provider: &str, issued_at: i64) -> IssuedState {
        let state = random_token(STATE_BYTES);
        let payload = format!("{provider}.{state}.{issued_at}");
        let signature = to_base64_url(&hmac_sha256(&self.key, payload.as_bytes()));
        IssuedState {
            cookie_value: format!("{payload}.{signature}"),
            state,
        }
    }

    /// Check the callback's `state` parameter against the state cookie
    pub fn verify(
        &self,
        provider: &str,
        cookie_value: Option<&str>,
        state_param: &str,
    ) -> AuthResult<()> {
        self.verify_at(provider, cookie_value, state_param, Utc::now().timestamp())
    }

    fn verify_at(
        &self,
        provider: &str,
        cookie_value: Option<&str>,
        state_param: &str,
        now: i64,
    ) -> AuthResult<()> {
        let cookie_value = cookie_value.ok_or(AuthError::InvalidOAuthState)?;

        let (payload, signature) = cookie_value
            .rsplit_once('.')
            .ok_or(AuthError::InvalidOAuthState)?;
        let signature = from_base64_url(signature).map_err(|_| AuthError::InvalidOAuthState)?;
        let expected = hmac_sha256(&self.key, payload.as_bytes());
        if !constant_time_eq(&signature, &expected) {
            return Err(AuthError::InvalidOAuthState);
        }

        let mut parts = payload.splitn(3, '.');
        let (Some(bound_provider), Some(state), Some(issued_at)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidOAuthState);
        };
        let issued_at: i64 = issued_at
            .parse()
            .map_err(|_| AuthError::InvalidOAuthState)?;

        if bound_provider != provider {
            return Err(AuthError::InvalidOAuthState);
        }
        if now > issued_at.saturating_add(self.ttl_secs) {
            return Err(AuthError::InvalidOAuthState);
        }
        if state_param.is_empty() || !constant_time_eq(state.as_bytes(), state_param.as_bytes())
        {
            return Err(AuthError::InvalidOAuthState);
        }

        Ok(())
    }
}
