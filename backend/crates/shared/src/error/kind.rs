//! Closed error taxonomy
//!
//! Every failure a handler can report is one of these kinds, and each kind
//! has exactly one HTTP status.

use serde::Serialize;

/// エラー分類
///
/// | kind | status |
/// |---|---|
/// | `BadRequest` | 400 |
/// | `Unauthorized` | 401 |
/// | `NotFound` | 404 |
/// | `Conflict` | 409 |
/// | `ProviderExchange` | 502 |
/// | `ProviderConfig` | 500 |
/// | `InternalServerError` | 500 |
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::ProviderExchange.status_code(), 502);
/// assert_eq!(ErrorKind::NotFound.to_string(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    BadRequest,
    /// 資格情報の不一致、セッショントークンの欠落・不正・期限切れ、OAuth state 不一致
    Unauthorized,
    NotFound,
    /// 一意制約違反
    Conflict,
    ProviderExchange,
    ProviderConfig,
    InternalServerError,
}

impl ErrorKind {
    const fn meta(self) -> (u16, &'static str) {
        match self {
            Self::BadRequest => (400, "Bad Request"),
            Self::Unauthorized => (401, "Unauthorized"),
            Self::NotFound => (404, "Not Found"),
            Self::Conflict => (409, "Conflict"),
            Self::ProviderExchange => (502, "Bad Gateway"),
            Self::ProviderConfig => (500, "Provider Misconfigured"),
            Self::InternalServerError => (500, "Internal Server Error"),
        }
    }

    pub const fn status_code(&self) -> u16 {
        self.meta().0
    }

    /// Reason phrase, also the body text for kinds whose message is hidden
    pub const fn as_str(&self) -> &'static str {
        self.meta().1
    }

    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Only internal errors keep their message out of the response body
    pub const fn exposes_message(&self) -> bool {
        !matches!(self, Self::InternalServerError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
