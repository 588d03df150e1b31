//! In-Memory Repository Implementation
//!
//! Same uniqueness rules as the PostgreSQL schema: one local account per
//! user name, one user per external key. Used by tests and by the
//! development server when no database is configured.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{ExternalKey, UserId, UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }

    /// Snapshot of every stored user
    pub async fn all(&self) -> Vec<User> {
        self.users.lock().await.values().cloned().collect()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().await;

        let conflict = users.values().any(|existing| {
            existing.user_id == user.user_id
                || (existing.external_key.is_some() && existing.external_key == user.external_key)
                || (existing.is_local() && user.is_local() && existing.user_name == user.user_name)
        });
        if conflict {
            return Err(AuthError::DuplicateUser);
        }

        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.lock().await.get(user_id).cloned())
    }

    async fn find_local_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.is_local() && &u.user_name == user_name)
            .cloned())
    }

    async fn find_by_external_key(
        &self,
        external_key: &ExternalKey,
    ) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.external_key.as_ref() == Some(external_key))
            .cloned())
    }

    async fn exists_local_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .any(|u| u.is_local() && &u.user_name == user_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{RawPassword, UserPassword};

    fn local(name: &str) -> User {
        let raw = RawPassword::new("longenough1".to_string()).unwrap();
        User::new_local(
            UserName::new(name).unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    fn external(name: &str, id: &str) -> User {
        User::new_external(
            UserName::from_provider(name),
            ExternalKey::new("github", id),
            None,
        )
    }

    #[tokio::test]
    async fn test_unique_external_key() {
        let repo = InMemoryUserRepository::new();
        repo.create(&external("bob", "4821")).await.unwrap();
        assert!(matches!(
            repo.create(&external("bobby", "4821")).await,
            Err(AuthError::DuplicateUser)
        ));
        repo.create(&external("bob", "4822")).await.unwrap();
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_unique_local_user_name() {
        let repo = InMemoryUserRepository::new();
        repo.create(&local("alice")).await.unwrap();
        assert!(matches!(
            repo.create(&local("alice")).await,
            Err(AuthError::DuplicateUser)
        ));

        // OAuth accounts may share a display name with a local account
        repo.create(&external("alice", "1")).await.unwrap();
        let found = repo
            .find_local_by_user_name(&UserName::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(found.is_local());
    }

    #[tokio::test]
    async fn test_lookups() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.is_empty().await);
        let user = external("bob", "4821");
        repo.create(&user).await.unwrap();

        let by_id = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(by_id.user_id, user.user_id);

        let by_key = repo
            .find_by_external_key(&ExternalKey::new("github", "4821"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_key.user_id, user.user_id);

        assert!(
            repo.find_by_external_key(&ExternalKey::new("google", "4821"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            !repo
                .exists_local_by_user_name(&UserName::new("bob").unwrap())
                .await
                .unwrap()
        );
    }
}
