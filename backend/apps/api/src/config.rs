//! Server configuration, read once from the environment at startup.

use anyhow::{Context, bail};
use auth::application::config::{MAX_SESSION_TTL, MIN_SESSION_SECRET_LEN};
use auth::{AuthConfig, ProviderSettings};
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> anyhow::Result<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("development") | Some("dev") => Ok(AppEnv::Development),
            Some("production") | Some("prod") => Ok(AppEnv::Production),
            Some(other) => bail!("APP_ENV must be `development` or `production`, got `{other}`"),
        }
    }

    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub app_env: AppEnv,
    pub server_address: SocketAddr,
    /// `None` selects the in-memory store (development only)
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_env = AppEnv::parse(var("APP_ENV").as_deref())?;

        let server_address = var("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse()
            .context("SERVER_ADDRESS must be host:port")?;

        let database_url = var("DATABASE_URL");
        if database_url.is_none() && !app_env.is_development() {
            bail!("DATABASE_URL must be set in production");
        }

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mut auth = match var("JWT_SECRET") {
            Some(secret) => {
                if secret.len() < MIN_SESSION_SECRET_LEN {
                    bail!("JWT_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes");
                }
                AuthConfig {
                    session_secret: secret.into_bytes(),
                    ..AuthConfig::default()
                }
            }
            None if app_env.is_development() => {
                tracing::warn!("JWT_SECRET not set, using a random secret; sessions end on restart");
                AuthConfig::with_random_secret()
            }
            None => bail!("JWT_SECRET must be set in production"),
        };

        if let Some(issuer) = var("JWT_ISSUER") {
            auth.issuer = issuer;
        }
        if let Some(ttl) = var("SESSION_TTL_SECS") {
            let secs: u64 = ttl.parse().context("SESSION_TTL_SECS must be a number")?;
            if secs == 0 || secs > MAX_SESSION_TTL.as_secs() {
                bail!(
                    "SESSION_TTL_SECS must be between 1 and {}",
                    MAX_SESSION_TTL.as_secs()
                );
            }
            auth.session_ttl = Duration::from_secs(secs);
        }
        // Secure unless explicitly disabled
        if let Some(v) = var("COOKIE_SECURE") {
            auth.cookie_secure = parse_bool(&v).context("COOKIE_SECURE must be true or false")?;
        }

        auth.github = provider_settings(&var, "GITHUB");
        auth.google = provider_settings(&var, "GOOGLE");

        Ok(Self {
            app_env,
            server_address,
            database_url,
            frontend_origins,
            auth,
        })
    }
}

fn provider_settings(var: &impl Fn(&str) -> Option<String>, prefix: &str) -> ProviderSettings {
    ProviderSettings {
        client_id: var(&format!("{prefix}_CLIENT_ID")),
        client_secret: var(&format!("{prefix}_CLIENT_SECRET")),
        redirect_url: var(&format!("{prefix}_REDIRECT_URL")),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_development_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.server_address.port(), 31113);
        assert!(config.database_url.is_none());
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.session_secret.len(), MIN_SESSION_SECRET_LEN);
        assert_eq!(config.auth.session_ttl, Duration::from_secs(86_400));
        assert_eq!(config.frontend_origins.len(), 2);
        assert!(!config.auth.github.is_configured());
    }

    #[test]
    fn test_production_requires_secret_and_database() {
        assert!(load(&[("APP_ENV", "production"), ("DATABASE_URL", "postgres://db")]).is_err());
        assert!(load(&[("APP_ENV", "production"), ("JWT_SECRET", SECRET)]).is_err());

        let config = load(&[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", SECRET),
        ])
        .unwrap();
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.session_secret, SECRET.as_bytes());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(load(&[("JWT_SECRET", "too-short")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SERVER_ADDRESS", "127.0.0.1:8080"),
            ("JWT_SECRET", SECRET),
            ("JWT_ISSUER", "notes"),
            ("SESSION_TTL_SECS", "3600"),
            ("COOKIE_SECURE", "false"),
            ("FRONTEND_ORIGINS", "https://notes.example, "),
            ("GITHUB_CLIENT_ID", "gh-id"),
            ("GITHUB_CLIENT_SECRET", "gh-secret"),
            ("GITHUB_REDIRECT_URL", "https://notes.example/auth/github/callback"),
        ])
        .unwrap();

        assert_eq!(config.server_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.auth.issuer, "notes");
        assert_eq!(config.auth.session_ttl_secs(), 3600);
        assert!(!config.auth.cookie_secure);
        assert_eq!(config.frontend_origins, vec!["https://notes.example"]);
        assert!(config.auth.github.is_configured());
        assert!(!config.auth.google.is_configured());
    }

    #[test]
    fn test_session_ttl_upper_bound() {
        let year = MAX_SESSION_TTL.as_secs().to_string();
        let config = load(&[("SESSION_TTL_SECS", year.as_str())]).unwrap();
        assert_eq!(config.auth.session_ttl, MAX_SESSION_TTL);

        let over = (MAX_SESSION_TTL.as_secs() + 1).to_string();
        for ttl in [over.as_str(), "9223372036854775807", "18446744073709551615"] {
            assert!(load(&[("SESSION_TTL_SECS", ttl)]).is_err(), "{ttl}");
        }
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("APP_ENV", "staging")]).is_err());
        assert!(load(&[("SESSION_TTL_SECS", "soon")]).is_err());
        assert!(load(&[("SESSION_TTL_SECS", "0")]).is_err());
        assert!(load(&[("COOKIE_SECURE", "maybe")]).is_err());
        assert!(load(&[("SERVER_ADDRESS", "nowhere")]).is_err());
    }
}
