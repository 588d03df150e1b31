//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::User;

// ============================================================================
// Local Accounts
// ============================================================================

/// Register request
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Register response
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub username: String,
}

impl From<&User> for RegisterResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            username: user.user_name.to_string(),
        }
    }
}

/// Login request
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn fmt_credentials(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    username: &str,
) -> std::fmt::Result {
    f.debug_struct(name)
        .field("username", &username)
        .field("password", &"[REDACTED]")
        .finish()
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_credentials(f, "RegisterRequest", &self.username)
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_credentials(f, "LoginRequest", &self.username)
    }
}

// ============================================================================
// OAuth
// ============================================================================

/// `?code=…&state=…` on the provider callback
///
/// Missing parameters deserialize as empty and are rejected later by the
/// state check or the code check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

// ============================================================================
// Users
// ============================================================================

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    /// Account created through an identity provider
    pub external: bool,
    /// Unix milliseconds
    pub created_at_ms: i64,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            username: user.user_name.to_string(),
            avatar_url: user.avatar_url_or_empty().to_string(),
            external: user.external_key.is_some(),
            created_at_ms: user.created_at.timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_requests_debug_is_redacted() {
        let body = r#"{"username":"alice","password":"longenough1"}"#;
        let login: LoginRequest = serde_json::from_str(body).unwrap();
        let register: RegisterRequest = serde_json::from_str(body).unwrap();

        for debug in [format!("{login:?}"), format!("{register:?}")] {
            assert!(debug.contains("alice"));
            assert!(debug.contains("[REDACTED]"));
            assert!(!debug.contains("longenough1"));
        }
    }

    #[test]
    fn test_callback_query_defaults() {
        let query: CallbackQuery = serde_json::from_str(r#"{"state":"abc"}"#).unwrap();
        assert_eq!(query.code, "");
        assert_eq!(query.state, "abc");
    }
}
