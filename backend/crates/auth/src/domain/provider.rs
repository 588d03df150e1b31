//! Identity Provider Trait
//!
//! An OAuth2 provider able to build a consent URL and turn a one-time
//! authorization code into a [`ProviderProfile`].

use crate::domain::entity::ProviderProfile;
use crate::error::AuthResult;

#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Provider name used in routes and external keys (`github`, `google`)
    fn name(&self) -> &str;

    /// Consent-redirect URL embedding `state`
    ///
    /// Fails with `ProviderConfig` when the client id or secret is unset.
    fn authorization_url(&self, state: &str) -> AuthResult<String>;

    /// Exchange the code for an access token and fetch the profile
    ///
    /// No retries. Fails with `ProviderExchange` on network, non-2xx or
    /// malformed responses.
    async fn exchange_code(&self, code: &str) -> AuthResult<ProviderProfile>;
}
