//! External Key Value Object
//!
//! 外部IDプロバイダのユーザーを本システム内で一意に識別するキー。
//! 形式は常に `"<プロバイダ名>_<プロバイダ側ID>"`（例: `github_4821`）。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalKey(String);

impl ExternalKey {
    pub fn new(provider: &str, provider_id: &str) -> Self {
        Self(format!("{provider}_{provider_id}"))
    }

    /// Create from database values
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ExternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExternalKey").field(&self.0).finish()
    }
}

impl fmt::Display for ExternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(ExternalKey::new("github", "4821").as_str(), "github_4821");
        assert_eq!(
            ExternalKey::new("google", "10769150350006150715113082367").to_string(),
            "google_10769150350006150715113082367"
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = ExternalKey::new("github", "1");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"github_1\"");
    }
}
