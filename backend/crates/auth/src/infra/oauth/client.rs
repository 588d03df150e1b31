//! OAuth Provider Client
//!
//! A single client type for every provider; per-provider behavior comes from
//! its [`ProviderSpec`]. The outbound HTTP client never follows redirects and
//! nothing is retried.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::header::{ACCEPT, USER_AGENT};
use std::fmt;

use super::provider::ProviderSpec;
use crate::application::config::ProviderSettings;
use crate::domain::entity::ProviderProfile;
use crate::domain::provider::IdentityProvider;
use crate::error::{AuthError, AuthResult};

/// Sent on profile requests (GitHub rejects requests without one)
const CLIENT_USER_AGENT: &str = concat!("notes-auth/", env!("CARGO_PKG_VERSION"));

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct OAuthClient {
    spec: ProviderSpec,
    settings: ProviderSettings,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(spec: ProviderSpec, settings: ProviderSettings) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            spec,
            settings,
            http,
        })
    }

    pub fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn create_client(&self) -> AuthResult<ConfiguredClient> {
        let name = self.spec.name;
        let missing = |var: &str| {
            AuthError::ProviderConfig(format!("{} is not set", env_name(name, var)))
        };

        let client_id = self
            .settings
            .client_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("CLIENT_ID"))?;
        let client_secret = self
            .settings
            .client_secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("CLIENT_SECRET"))?;

        let invalid = |what: &str, e: oauth2::url::ParseError| {
            AuthError::ProviderConfig(format!("{name} {what} is not a valid URL: {e}"))
        };
        let auth_url = AuthUrl::new(self.spec.endpoints.authorize_url.clone())
            .map_err(|e| invalid("authorize URL", e))?;
        let token_url = TokenUrl::new(self.spec.endpoints.token_url.clone())
            .map_err(|e| invalid("token URL", e))?;

        let mut client = BasicClient::new(ClientId::new(client_id))
            .set_client_secret(ClientSecret::new(client_secret))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url);

        if let Some(redirect) = self.settings.redirect_url.as_ref().filter(|s| !s.is_empty()) {
            let redirect_url =
                RedirectUrl::new(redirect.clone()).map_err(|e| invalid("redirect URL", e))?;
            client = client.set_redirect_uri(redirect_url);
        }

        Ok(client)
    }

    async fn fetch_profile(&self, access_token: &str) -> AuthResult<ProviderProfile> {
        let exchange_failed = |e: reqwest::Error| {
            AuthError::ProviderExchange(format!("{} profile request failed: {e}", self.spec.name))
        };

        let body = self
            .http
            .get(&self.spec.endpoints.profile_url)
            .bearer_auth(access_token)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(exchange_failed)?
            .error_for_status()
            .map_err(exchange_failed)?
            .bytes()
            .await
            .map_err(exchange_failed)?;

        (self.spec.normalize)(&body).map_err(|e| {
            AuthError::ProviderExchange(format!("{} returned a malformed profile: {e}", self.spec.name))
        })
    }
}

impl IdentityProvider for OAuthClient {
    fn name(&self) -> &str {
        self.spec.name
    }

    fn authorization_url(&self, state: &str) -> AuthResult<String> {
        let client = self.create_client()?;

        let state = state.to_string();
        let (url, _) = self
            .spec
            .scopes
            .iter()
            .fold(
                client.authorize_url(move || CsrfToken::new(state)),
                |request, scope| request.add_scope(Scope::new(scope.to_string())),
            )
            .url();

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<ProviderProfile> {
        let client = self.create_client()?;

        let token = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| {
                AuthError::ProviderExchange(format!("{} token exchange failed: {e}", self.spec.name))
            })?;

        self.fetch_profile(token.access_token().secret()).await
    }
}

impl fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClient")
            .field("provider", &self.spec.name)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// `github` + `CLIENT_ID` → `GITHUB_CLIENT_ID`
fn env_name(provider: &str, var: &str) -> String {
    format!("{}_{}", provider.to_ascii_uppercase(), var)
}
