//! Provider Specifications
//!
//! One small record per identity provider: endpoints, scopes and the
//! function that turns its user-info JSON into a [`ProviderProfile`].

use serde::Deserialize;

use crate::domain::entity::ProviderProfile;

/// Profile normalizer: raw user-info body to profile
pub type ProfileNormalizer = fn(&[u8]) -> Result<ProviderProfile, serde_json::Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub profile_url: String,
}

#[derive(Debug, Clone)]
pub struct ProviderSpec {
    pub name: &'static str,
    pub endpoints: ProviderEndpoints,
    pub scopes: &'static [&'static str],
    pub normalize: ProfileNormalizer,
}

impl ProviderSpec {
    pub fn github() -> Self {
        Self {
            name: "github",
            endpoints: ProviderEndpoints {
                authorize_url: "https://github.com/login/oauth/authorize".to_string(),
                token_url: "https://github.com/login/oauth/access_token".to_string(),
                profile_url: "https://api.github.com/user".to_string(),
            },
            scopes: &["read:user"],
            normalize: normalize_github,
        }
    }

    pub fn google() -> Self {
        Self {
            name: "google",
            endpoints: ProviderEndpoints {
                authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
                profile_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            },
            scopes: &["openid", "email", "profile"],
            normalize: normalize_google,
        }
    }

    /// Point the provider at other endpoints (e.g. a local mock)
    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

// ============================================================================
// GitHub
// ============================================================================

/// `GET https://api.github.com/user`
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    avatar_url: Option<String>,
}

fn normalize_github(body: &[u8]) -> Result<ProviderProfile, serde_json::Error> {
    let user: GitHubUser = serde_json::from_slice(body)?;
    Ok(ProviderProfile {
        provider_id: user.id.to_string(),
        display_name: user.login,
        avatar_url: non_empty(user.avatar_url),
    })
}

// ============================================================================
// Google
// ============================================================================

/// `GET https://www.googleapis.com/oauth2/v2/userinfo`
#[derive(Debug, Deserialize)]
struct GoogleUser {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

fn normalize_google(body: &[u8]) -> Result<ProviderProfile, serde_json::Error> {
    let user: GoogleUser = serde_json::from_slice(body)?;
    // name → email → id
    let display_name = non_empty(user.name)
        .or_else(|| non_empty(user.email))
        .unwrap_or_else(|| user.id.clone());
    Ok(ProviderProfile {
        provider_id: user.id,
        display_name,
        avatar_url: non_empty(user.picture),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_profile() {
        let body = br#"{"id":4821,"login":"bob","avatar_url":"https://avatars.githubusercontent.com/u/4821","name":null}"#;
        let profile = (ProviderSpec::github().normalize)(body).unwrap();
        assert_eq!(
            profile,
            ProviderProfile {
                provider_id: "4821".to_string(),
                display_name: "bob".to_string(),
                avatar_url: Some("https://avatars.githubusercontent.com/u/4821".to_string()),
            }
        );
        assert_eq!(profile.external_key("github").as_str(), "github_4821");
    }

    #[test]
    fn test_github_rejects_string_id() {
        let body = br#"{"id":"4821","login":"bob"}"#;
        assert!((ProviderSpec::github().normalize)(body).is_err());
    }

    #[test]
    fn test_google_name_fallbacks() {
        let normalize = ProviderSpec::google().normalize;

        let full = normalize(br#"{"id":"1077","email":"j@example.com","name":"Jane Doe","picture":"https://lh3/p.jpg"}"#).unwrap();
        assert_eq!(full.display_name, "Jane Doe");
        assert_eq!(full.avatar_url.as_deref(), Some("https://lh3/p.jpg"));

        let no_name = normalize(br#"{"id":"1077","email":"j@example.com","name":""}"#).unwrap();
        assert_eq!(no_name.display_name, "j@example.com");
        assert_eq!(no_name.avatar_url, None);

        let bare = normalize(br#"{"id":"1077"}"#).unwrap();
        assert_eq!(bare.display_name, "1077");
        assert_eq!(bare.provider_id, "1077");
    }

    #[test]
    fn test_malformed_body() {
        assert!((ProviderSpec::google().normalize)(b"<html>").is_err());
        assert!((ProviderSpec::google().normalize)(br#"{"email":"x"}"#).is_err());
    }

    #[test]
    fn test_builtin_endpoints() {
        let github = ProviderSpec::github();
        assert_eq!(github.endpoints.profile_url, "https://api.github.com/user");
        assert_eq!(github.scopes, &["read:user"]);

        let google = ProviderSpec::google();
        assert_eq!(google.endpoints.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(google.scopes, &["openid", "email", "profile"]);
    }
}
