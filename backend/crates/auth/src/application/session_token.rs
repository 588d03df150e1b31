//! Session Token Service
//!
//! Issues and verifies the HS256 JWT carried in the session cookie.
//!
//! - `iss` is always the configured issuer
//! - `iat` is now, `exp` is now + session TTL; callers cannot choose expiry
//! - verification accepts HS256 only, with zero leeway on `exp`

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::error::{AuthError, AuthResult};

/// Identity facts embedded in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub username: String,
    /// Internal user ID (UUID string)
    pub user_id: String,
    #[serde(default)]
    pub avatar_url: String,
    /// External key for OAuth accounts
    #[serde(default, rename = "oauth_key", skip_serializing_if = "Option::is_none")]
    pub external_key: Option<String>,
}

impl From<&User> for SessionIdentity {
    fn from(user: &User) -> Self {
        Self {
            username: user.user_name.to_string(),
            user_id: user.user_id.to_string(),
            avatar_url: user.avatar_url_or_empty().to_string(),
            external_key: user.external_key.as_ref().map(|k| k.to_string()),
        }
    }
}

/// Verified session claims, attached to gated requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub identity: SessionIdentity,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and the claims inside it
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Session token issuer / verifier
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_secs: i64,
}

impl SessionTokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(&config.session_secret),
            decoding_key: DecodingKey::from_secret(&config.session_secret),
            validation,
            issuer: config.issuer.clone(),
            ttl_secs: config.session_ttl_secs(),
        }
    }

    /// Sign a new session for `identity`
    pub fn issue(&self, identity: SessionIdentity) -> AuthResult<IssuedSession> {
        let now = Utc::now().timestamp();
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| AuthError::Internal("session expiry out of range".to_string()))?;
        let claims = SessionClaims {
            identity,
            iss: self.issuer.clone(),
            iat: now,
            exp,
        };
        let token = self.sign(&claims)?;
        Ok(IssuedSession { token, claims })
    }

    fn sign(&self, claims: &SessionClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign session token: {e}")))
    }

    /// Check algorithm, signature, expiry and issuer
    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

impl fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (AuthConfig, SessionTokenService) {
        let config = AuthConfig::development();
        let service = SessionTokenService::new(&config);
        (config, service)
    }

    fn identity() -> SessionIdentity {
        SessionIdentity {
            username: "bob".to_string(),
            user_id: "7d3a2a8e-4d6f-4a8e-9a4a-2b1f0c9e8d7c".to_string(),
            avatar_url: "https://avatars.example/bob.png".to_string(),
            external_key: Some("github_4821".to_string()),
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let (config, service) = service();
        let issued = service.issue(identity()).unwrap();

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.iss, config.issuer);
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_oversized_ttl_is_an_error_not_a_panic() {
        let config = AuthConfig {
            session_ttl: std::time::Duration::from_secs(u64::MAX),
            ..AuthConfig::development()
        };
        let service = SessionTokenService::new(&config);

        assert!(matches!(
            service.issue(identity()),
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn test_wire_claim_names() {
        let (_, service) = service();
        let issued = service.issue(identity()).unwrap();
        let value = serde_json::to_value(&issued.claims).unwrap();
        assert_eq!(value["username"], "bob");
        assert_eq!(value["oauth_key"], "github_4821");
        assert!(value.get("identity").is_none());

        let local = SessionIdentity {
            external_key: None,
            ..identity()
        };
        let value = serde_json::to_value(service.issue(local).unwrap().claims).unwrap();
        assert!(value.get("oauth_key").is_none());
    }

    #[test]
    fn test_flipped_signature_is_invalid() {
        let (_, service) = service();
        let token = service.issue(identity()).unwrap().token;

        let (head, sig) = token.rsplit_once('.').unwrap();
        let mut sig = sig.as_bytes().to_vec();
        sig[0] = if sig[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{head}.{}", String::from_utf8(sig).unwrap());

        assert!(matches!(service.verify(&tampered), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_altered_payload_is_invalid() {
        let (_, service) = service();
        let token = service.issue(identity()).unwrap().token;
        let other = service
            .issue(SessionIdentity {
                username: "mallory".to_string(),
                ..identity()
            })
            .unwrap()
            .token;

        // Payload of one token with the signature of another
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(service.verify(&spliced), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let (config, service) = service();
        let claims = service.issue(identity()).unwrap().claims;
        let hs512 = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(&config.session_secret),
        )
        .unwrap();

        assert!(matches!(service.verify(&hs512), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let (_, service) = service();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            identity: identity(),
            iss: service.issuer.clone(),
            iat: now - 7200,
            exp: now - 60,
        };
        let token = service.sign(&claims).unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_wrong_issuer_or_secret_is_invalid() {
        let (_, service) = service();
        let token = service.issue(identity()).unwrap().token;

        let foreign = SessionTokenService::new(&AuthConfig {
            issuer: "someone-else".to_string(),
            ..AuthConfig::development()
        });
        assert!(matches!(foreign.verify(&token), Err(AuthError::InvalidToken)));

        let mut same_secret = AuthConfig::development();
        same_secret.session_secret = b"a-completely-different-secret-value!".to_vec();
        let rekeyed = SessionTokenService::new(&same_secret);
        assert!(matches!(rekeyed.verify(&token), Err(AuthError::InvalidToken)));

        assert!(matches!(service.verify("not.a.jwt"), Err(AuthError::InvalidToken)));
        assert!(matches!(service.verify(""), Err(AuthError::InvalidToken)));
    }
}
