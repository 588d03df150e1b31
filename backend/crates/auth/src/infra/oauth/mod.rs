//! OAuth provider integrations

pub mod client;
pub mod provider;

pub use client::OAuthClient;
pub use provider::{ProviderEndpoints, ProviderSpec};
