//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::User;
use crate::domain::value_object::{ExternalKey, UserId, UserName};
use crate::error::AuthResult;

/// User repository trait
///
/// Implementations enforce uniqueness of the user name among local accounts
/// and of the external key. A rejected insert is reported as
/// [`AuthError::DuplicateUser`](crate::error::AuthError::DuplicateUser).
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user atomically
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find the local (password) account with this user name
    async fn find_local_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Find user by external key
    async fn find_by_external_key(
        &self,
        external_key: &ExternalKey,
    ) -> AuthResult<Option<User>>;

    /// Check if a local account already uses this user name
    async fn exists_local_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;
}
