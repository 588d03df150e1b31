//! Password value objects
//!
//! [`RawPassword`] is what the user typed; [`UserPassword`] is what the store
//! keeps. Hashing itself lives in `platform::password`.
//!
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("longenough1".to_string()).unwrap();
//! let stored = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(stored.verify(&RawPassword::for_login("longenough1".into()), None));
//! ```

use platform::password::{ClearTextPassword, HashedPassword};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// 入力されたままのパスワード（drop 時にゼロ化）
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// 登録用: 8〜128 文字、制御文字なし、よくあるパターンは拒否
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|policy| AuthError::BadRequest(policy.to_string()))
    }

    /// ログイン用: 正規化のみ
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::from_login_input(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// 保存用の Argon2id ハッシュ
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// DB から読んだ PHC 文字列。壊れていればサーバーエラー
    pub fn from_phc_string(phc: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|_| AuthError::Internal("Invalid password hash in database".to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    /// ハッシュを持たないアカウント向け。常に `false` だが検証と同じ時間を使う
    pub fn verify_absent(raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        HashedPassword::verify_absent(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(input: &str) -> String {
        match RawPassword::new(input.to_string()) {
            Err(AuthError::BadRequest(message)) => message,
            other => panic!("expected BadRequest for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_policy_failures_are_bad_requests() {
        assert!(rejection("short").contains("at least 8"));
        assert!(rejection(&"a1".repeat(65)).contains("at most 128"));
        assert!(rejection("password123").contains("too common"));
        assert!(rejection("          ").contains("empty"));
        assert!(RawPassword::new("longenough1".to_string()).is_ok());
    }

    #[test]
    fn test_login_input_skips_policy() {
        let stored = UserPassword::from_raw(&RawPassword::new("longenough1".into()).unwrap(), None)
            .unwrap();

        assert!(stored.verify(&RawPassword::for_login("longenough1".into()), None));
        assert!(!stored.verify(&RawPassword::for_login("short".into()), None));
        assert!(!stored.verify(&RawPassword::for_login(String::new()), None));
    }

    #[test]
    fn test_stored_form() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();

        let reloaded = UserPassword::from_phc_string(stored.as_phc_string()).unwrap();
        assert!(reloaded.verify(&raw, Some(b"pepper")));
        assert!(!reloaded.verify(&raw, None));

        assert!(matches!(
            UserPassword::from_phc_string("plaintext"),
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, None).unwrap();

        assert_eq!(format!("{raw:?}"), "RawPassword([REDACTED])");
        assert_eq!(format!("{stored:?}"), "UserPassword([HASH])");
    }
}
