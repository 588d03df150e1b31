//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared read-only behind an `Arc`.

use std::fmt;
use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
use platform::cookie::CookieConfig;

/// Minimum accepted length of the session signing secret
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Longest session lifetime the server accepts (one year)
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// Client registration for one OAuth provider
#[derive(Clone, Default)]
pub struct ProviderSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Callback URL registered with the provider
    pub redirect_url: Option<String>,
}

impl ProviderSettings {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            redirect_url: Some(redirect_url.into()),
        }
    }

    /// Both client id and secret are set and non-empty
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        set(&self.client_id) && set(&self.client_secret)
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HS256 signing secret for session tokens (also keys the OAuth state cookie)
    pub session_secret: Vec<u8>,
    /// `iss` claim written and required
    pub issuer: String,
    /// Session token lifetime and cookie Max-Age (24 hours)
    pub session_ttl: Duration,
    /// OAuth state cookie name
    pub oauth_state_cookie_name: String,
    /// Lifetime of an OAuth state (10 minutes)
    pub oauth_state_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub github: ProviderSettings,
    pub google: ProviderSettings,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "JWT".to_string(),
            session_secret: Vec::new(),
            issuer: "notes-auth".to_string(),
            session_ttl: Duration::from_secs(24 * 3600), // 24 hours
            oauth_state_cookie_name: "oauth_state".to_string(),
            oauth_state_ttl: Duration::from_secs(10 * 60), // 10 minutes
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            github: ProviderSettings::default(),
            google: ProviderSettings::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_bytes(MIN_SESSION_SECRET_LEN),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Session TTL in whole seconds, saturating at `i64::MAX`
    pub fn session_ttl_secs(&self) -> i64 {
        i64::try_from(self.session_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// OAuth state TTL in whole seconds, saturating at `i64::MAX`
    pub fn oauth_state_ttl_secs(&self) -> i64 {
        i64::try_from(self.oauth_state_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Attributes of the `JWT` cookie
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig::new(&self.session_cookie_name)
            .with_secure(self.cookie_secure)
            .with_same_site(self.cookie_same_site)
            .with_max_age(self.session_ttl.as_secs())
    }

    /// Attributes of the `oauth_state` cookie
    pub fn oauth_state_cookie(&self) -> CookieConfig {
        CookieConfig::new(&self.oauth_state_cookie_name)
            .with_secure(self.cookie_secure)
            .with_same_site(self.cookie_same_site)
            .with_max_age(self.oauth_state_ttl.as_secs())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("session_ttl", &self.session_ttl)
            .field("oauth_state_ttl", &self.oauth_state_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("github", &self.github)
            .field("google", &self.google)
            .finish_non_exhaustive()
    }
}
