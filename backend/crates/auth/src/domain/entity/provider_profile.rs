//! Provider Profile
//!
//! Normalized identity reported by an OAuth provider after a successful
//! code exchange.

use crate::domain::value_object::ExternalKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Provider-assigned user ID, always as a string
    pub provider_id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl ProviderProfile {
    pub fn external_key(&self, provider: &str) -> ExternalKey {
        ExternalKey::new(provider, &self.provider_id)
    }
}
