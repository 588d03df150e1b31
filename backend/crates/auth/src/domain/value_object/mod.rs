//! Value Object Module

pub mod external_key;
pub mod user_name;
pub mod user_password;

pub use external_key::ExternalKey;
pub use kernel::id::UserId;
pub use user_name::{UserName, UserNameError};
pub use user_password::{RawPassword, UserPassword};
