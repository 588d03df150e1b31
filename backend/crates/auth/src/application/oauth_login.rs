//! OAuth Login Use Case
//!
//! Two legs of the authorization-code flow:
//! 1. `begin`: pick the provider, mint a state, build the consent URL
//! 2. `complete`: check the state, exchange the code, resolve the user, and
//!    issue a session

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::identity_resolver::IdentityResolver;
use crate::application::oauth_state::OAuthStateGuard;
use crate::application::session_token::{IssuedSession, SessionIdentity, SessionTokenService};
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Identity providers addressable by route name
pub struct ProviderRegistry<P> {
    providers: BTreeMap<String, Arc<P>>,
}

impl<P> Default for ProviderRegistry<P> {
    fn default() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }
}

impl<P> ProviderRegistry<P>
where
    P: IdentityProvider,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name, replacing any previous one
    pub fn with(mut self, provider: P) -> Self {
        self.providers
            .insert(provider.name().to_string(), Arc::new(provider));
        self
    }

    pub fn get(&self, name: &str) -> AuthResult<Arc<P>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| AuthError::UnknownProvider(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

/// Where to send the browser, and the state cookie to set on the way
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub authorization_url: String,
    pub state_cookie_value: String,
}

/// Callback query parameters
#[derive(Debug, Clone)]
pub struct CallbackInput {
    pub code: String,
    pub state: String,
    /// Value of the `oauth_state` cookie, if the browser sent one
    pub state_cookie: Option<String>,
}

pub struct OAuthLoginUseCase<R, P>
where
    R: UserRepository,
    P: IdentityProvider,
{
    resolver: IdentityResolver<R>,
    providers: Arc<ProviderRegistry<P>>,
    tokens: Arc<SessionTokenService>,
    state_guard: Arc<OAuthStateGuard>,
}

impl<R, P> OAuthLoginUseCase<R, P>
where
    R: UserRepository,
    P: IdentityProvider,
{
    pub fn new(
        repo: Arc<R>,
        config: Arc<AuthConfig>,
        providers: Arc<ProviderRegistry<P>>,
        tokens: Arc<SessionTokenService>,
        state_guard: Arc<OAuthStateGuard>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(repo, config),
            providers,
            tokens,
            state_guard,
        }
    }

    pub fn begin(&self, provider_name: &str) -> AuthResult<LoginRedirect> {
        let provider = self.providers.get(provider_name)?;
        let issued = self.state_guard.issue(provider.name());
        let authorization_url = provider.authorization_url(&issued.state)?;

        tracing::debug!(provider = provider.name(), "Redirecting to provider");

        Ok(LoginRedirect {
            authorization_url,
            state_cookie_value: issued.cookie_value,
        })
    }

    pub async fn complete(
        &self,
        provider_name: &str,
        input: CallbackInput,
    ) -> AuthResult<IssuedSession> {
        let provider = self.providers.get(provider_name)?;

        self.state_guard
            .verify(provider.name(), input.state_cookie.as_deref(), &input.state)?;

        if input.code.is_empty() {
            return Err(AuthError::BadRequest("missing authorization code".to_string()));
        }

        let profile = provider.exchange_code(&input.code).await?;
        let external_key = profile.external_key(provider.name());
        let user = self
            .resolver
            .resolve_oauth_user(&profile, &external_key)
            .await?;

        let session = self.tokens.issue(SessionIdentity::from(&user))?;

        tracing::info!(
            provider = provider.name(),
            user_id = %user.user_id,
            "OAuth login completed"
        );

        Ok(session)
    }
}
