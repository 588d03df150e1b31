//! [`AppError`] and [`AppResult`]
//!
//! 境界をまたぐエラーはすべてこの型に落とす。
//! 本文を書くのはエラーチャネルだけで、ハンドラは値を返すだけ。

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

type BoxedSource = Box<dyn Error + Send + Sync + 'static>;

/// 分類済みのエラー
///
/// `message` はクライアントに見せてよい文言。原因の詳細は `source` に
/// 積んでおき、ログにだけ出す。
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::not_found("User not found");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.status_code(), 404);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    source: Option<BoxedSource>,
}

pub type AppResult<T> = Result<T, AppError>;

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(message: impl Into<Cow<'static, str>>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )+
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    kind_constructors! {
        bad_request => BadRequest,
        unauthorized => Unauthorized,
        not_found => NotFound,
        conflict => Conflict,
        /// 502: プロバイダとのコード交換・プロフィール取得に失敗
        provider_exchange => ProviderExchange,
        /// 500: プロバイダのクライアント設定が欠けている
        provider_config => ProviderConfig,
        /// 500: メッセージはクライアントに出ない
        internal => InternalServerError,
    }

    /// 原因を添付する（ログ専用）
    ///
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn load() -> AppResult<String> {
    ///     std::fs::read_to_string("/nonexistent")
    ///         .map_err(|e| AppError::internal("could not load").with_source(e))
    /// }
    /// assert!(load().is_err());
    /// ```
    pub fn with_source(self, source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 本文に載せる文言。内部エラーなら種別の定型文になる
    pub fn public_message(&self) -> &str {
        match self.kind.exposes_message() {
            true => &self.message,
            false => self.kind.as_str(),
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_kinds() {
        let pairs = [
            (AppError::bad_request("m"), 400),
            (AppError::unauthorized("m"), 401),
            (AppError::not_found("m"), 404),
            (AppError::conflict("m"), 409),
            (AppError::provider_exchange("m"), 502),
            (AppError::provider_config("m"), 500),
            (AppError::internal("m"), 500),
        ];
        for (err, status) in pairs {
            assert_eq!(err.status_code(), status, "{err}");
            assert_eq!(err.message(), "m");
        }
    }

    #[test]
    fn test_source_is_chained() {
        let io = std::io::Error::other("disk gone");
        let err = AppError::internal("write failed").with_source(io);

        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk gone"));
        assert!(AppError::internal("write failed").source().is_none());
    }

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::conflict("User name already exists");
        assert_eq!(err.to_string(), "[Conflict] User name already exists");
    }

    #[test]
    fn test_public_message() {
        let hidden = AppError::internal("connection to 10.0.0.3 refused");
        assert_eq!(hidden.public_message(), "Internal Server Error");
        assert!(hidden.is_server_error());

        let shown = AppError::provider_config("GITHUB_CLIENT_ID is not set");
        assert_eq!(shown.public_message(), "GITHUB_CLIENT_ID is not set");
    }
}
