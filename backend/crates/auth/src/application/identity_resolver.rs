//! Identity Resolver
//!
//! Maps a verified credential (local password or provider profile) to the
//! internal [`User`], creating the record on first sight.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{ProviderProfile, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{ExternalKey, RawPassword, UserId, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Identity resolver
pub struct IdentityResolver<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> IdentityResolver<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Find or create the user behind a provider profile
    ///
    /// An existing record is returned unchanged. When a concurrent first
    /// login wins the insert, the winner's record is re-read and returned.
    pub async fn resolve_oauth_user(
        &self,
        profile: &ProviderProfile,
        external_key: &ExternalKey,
    ) -> AuthResult<User> {
        if let Some(user) = self.repo.find_by_external_key(external_key).await? {
            return Ok(user);
        }

        let user = User::new_external(
            UserName::from_provider(&profile.display_name),
            external_key.clone(),
            profile.avatar_url.clone(),
        );

        match self.repo.create(&user).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %user.user_id,
                    external_key = %external_key,
                    "User created from provider profile"
                );
                Ok(user)
            }
            Err(AuthError::DuplicateUser) => {
                tracing::debug!(
                    external_key = %external_key,
                    "Lost first-login race, reading existing user"
                );
                self.repo
                    .find_by_external_key(external_key)
                    .await?
                    .ok_or_else(|| {
                        AuthError::Internal(format!(
                            "external key {external_key} conflicted but is not stored"
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Register a local username/password account
    pub async fn register_local_user(
        &self,
        user_name: &str,
        password: String,
    ) -> AuthResult<User> {
        let user_name =
            UserName::new(user_name).map_err(|e| AuthError::BadRequest(e.to_string()))?;
        let raw_password = RawPassword::new(password)?;

        if self.repo.exists_local_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new_local(user_name, password_hash);

        match self.repo.create(&user).await {
            Ok(()) => {}
            Err(AuthError::DuplicateUser) => return Err(AuthError::UserNameTaken),
            Err(e) => return Err(e),
        }

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(user)
    }

    /// Check a local username/password pair
    ///
    /// Unknown user, OAuth-only account and wrong password are
    /// indistinguishable to the caller.
    pub async fn authenticate_local_user(
        &self,
        user_name: &str,
        password: String,
    ) -> AuthResult<User> {
        let raw_password = RawPassword::for_login(password);

        let user = match UserName::new(user_name) {
            Ok(user_name) => self.repo.find_local_by_user_name(&user_name).await?,
            Err(_) => None,
        };

        let verified = match user.as_ref().and_then(|u| u.password.as_ref()) {
            Some(hash) => hash.verify(&raw_password, self.config.pepper()),
            None => UserPassword::verify_absent(&raw_password, self.config.pepper()),
        };

        match user {
            Some(user) if verified => {
                tracing::info!(user_id = %user.user_id, "User signed in");
                Ok(user)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub async fn check_user_exists(&self, user_id: &UserId) -> AuthResult<bool> {
        Ok(self.repo.find_by_id(user_id).await?.is_some())
    }

    pub async fn get_user_by_id(&self, user_id: &UserId) -> AuthResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
