//! Entities

pub mod provider_profile;
pub mod user;

pub use provider_profile::ProviderProfile;
pub use user::User;
