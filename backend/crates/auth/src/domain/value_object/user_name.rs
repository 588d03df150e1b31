//! ユーザー名
//!
//! 表示とローカルログインの両方に使うハンドル。入力は NFKC 正規化して
//! 前後の空白を落とし、大文字小文字は区別したまま完全一致で比べる。
//!
//! ローカル登録の名前だけが検証対象で、プロバイダから来た表示名
//! （"Jane Doe" のように空白を含むもの）はそのまま受け入れる。

use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// ローカルアカウント名の長さ（正規化後の文字数）
pub const USER_NAME_LENGTH: RangeInclusive<usize> = 3..=30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name must be 3 to 30 characters (got {0})")]
    Length(usize),

    #[error("User name cannot contain control characters")]
    ControlCharacter,

    #[error("User name cannot contain whitespace")]
    ContainsWhitespace,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// ローカル登録用。長さ・制御文字・空白を検証する
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let name = normalize(input.as_ref());

        if name.is_empty() {
            return Err(UserNameError::Empty);
        }
        let length = name.chars().count();
        if !USER_NAME_LENGTH.contains(&length) {
            return Err(UserNameError::Length(length));
        }
        if let Some(bad) = name.chars().find(|c| c.is_control() || c.is_whitespace()) {
            return Err(if bad.is_control() {
                UserNameError::ControlCharacter
            } else {
                UserNameError::ContainsWhitespace
            });
        }

        Ok(Self(name))
    }

    /// プロバイダの表示名。正規化のみ
    pub fn from_provider(display_name: impl AsRef<str>) -> Self {
        Self(normalize(display_name.as_ref()))
    }

    /// 保存済みの値
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn normalize(input: &str) -> String {
    let normalized: String = input.nfkc().collect();
    normalized.trim().to_owned()
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserName({:?})", self.0)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
