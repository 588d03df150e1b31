//! User Entity
//!
//! Internal identity record shared by local and OAuth accounts.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{ExternalKey, UserId, UserName, UserPassword};

/// User entity
///
/// Invariant: at least one of `password` and `external_key` is present.
/// Users are never deleted and never updated once created.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Display name (unique among local accounts)
    pub user_name: UserName,
    /// Argon2id hash, local accounts only
    pub password: Option<UserPassword>,
    /// `<provider>_<id>`, OAuth accounts only
    pub external_key: Option<ExternalKey>,
    pub avatar_url: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a local (username/password) user
    pub fn new_local(user_name: UserName, password: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            user_name,
            password: Some(password),
            external_key: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a user first seen through an identity provider
    pub fn new_external(
        user_name: UserName,
        external_key: ExternalKey,
        avatar_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            user_name,
            password: None,
            external_key: Some(external_key),
            avatar_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user can sign in with a password
    pub fn is_local(&self) -> bool {
        self.password.is_some()
    }

    /// Avatar URL, empty when the user has none
    pub fn avatar_url_or_empty(&self) -> &str {
        self.avatar_url.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::RawPassword;

    #[test]
    fn test_new_local_has_password_only() {
        let raw = RawPassword::new("longenough1".to_string()).unwrap();
        let user = User::new_local(
            UserName::new("alice").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        );
        assert!(user.is_local());
        assert!(user.external_key.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_new_external_has_key_only() {
        let user = User::new_external(
            UserName::from_provider("bob"),
            ExternalKey::new("github", "4821"),
            None,
        );
        assert!(!user.is_local());
        assert_eq!(user.external_key.unwrap().as_str(), "github_4821");
        assert_eq!(user.avatar_url, None);
    }

    #[test]
    fn test_ids_are_fresh() {
        let a = User::new_external(
            UserName::from_provider("x"),
            ExternalKey::new("github", "1"),
            None,
        );
        let b = User::new_external(
            UserName::from_provider("x"),
            ExternalKey::new("github", "2"),
            None,
        );
        assert_ne!(a.user_id, b.user_id);
    }
}
