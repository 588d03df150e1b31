//! Credential Store Adapter
//!
//! The only place that touches Argon2id. Clear text goes in through
//! [`ClearTextPassword`] and comes out as a PHC string in [`HashedPassword`];
//! the clear text is zeroized on drop and never formatted.
//!
//! Registration input passes the policy below, login input does not:
//!
//! | rule | limit |
//! |---|---|
//! | length (code points, after NFKC) | 8..=128 |
//! | whitespace only | rejected |
//! | control characters other than `\t` `\n` | rejected |
//! | repeated character, digit run, keyboard row, top-list password | rejected |

use std::fmt;
use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Registration policy violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Argon2id v0x13 with the crate defaults (m=19456 KiB, t=2, p=1)
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Password bytes with the optional pepper appended, wiped after use
fn peppered(password: &[u8], pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
    let mut bytes = Vec::with_capacity(password.len() + pepper.map_or(0, <[u8]>::len));
    bytes.extend_from_slice(password);
    if let Some(pepper) = pepper {
        bytes.extend_from_slice(pepper);
    }
    Zeroizing::new(bytes)
}

// ============================================================================
// Clear Text
// ============================================================================

/// Clear text password, zeroized on drop
///
/// Not `Clone`; `Debug` is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("longenough1".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// NFKC-normalize, then apply the registration policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self::from_login_input(raw);
        check_policy(&candidate.0)?;
        Ok(candidate)
    }

    /// NFKC-normalize only
    ///
    /// Login input must reach the verifier whatever it looks like, and must
    /// normalize the same way as at registration.
    pub fn from_login_input(mut raw: String) -> Self {
        let normalized = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    /// Hash with a fresh 16-byte random salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let input = peppered(self.0.as_bytes(), pepper);
        let salt = SaltString::generate(&mut OsRng);

        let phc = hasher()
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(HashedPassword { phc })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

// ============================================================================
// Hashed
// ============================================================================

/// Argon2id hash in PHC string form (`$argon2id$v=19$m=…,t=…,p=…$salt$hash`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    phc: String,
}

impl HashedPassword {
    /// Wrap a stored PHC string, rejecting anything that does not parse
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// Parameters are read from the PHC string, so hashes made with older
    /// parameters still verify. Comparison is constant-time inside argon2.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };
        let input = peppered(password.0.as_bytes(), pepper);
        hasher().verify_password(&input, &parsed).is_ok()
    }

    /// Run one verification against a throwaway hash and return `false`
    ///
    /// Used when the account has no hash at all, so that the rejection costs
    /// the same as a wrong password.
    pub fn verify_absent(password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        static DUMMY: OnceLock<Option<HashedPassword>> = OnceLock::new();

        let dummy = DUMMY.get_or_init(|| {
            ClearTextPassword(String::from("dummy-password-for-timing"))
                .hash(None)
                .ok()
        });
        if let Some(dummy) = dummy {
            let _ = dummy.verify(password, pepper);
        }
        false
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}

// ============================================================================
// Policy
// ============================================================================

const KEYBOARD_ROWS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];

const TOP_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "abcdefgh",
    "letmein",
    "welcome",
    "admin123",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "trustno1",
];

fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::EmptyOrWhitespace);
    }

    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual,
        });
    }
    if actual > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual,
        });
    }

    if password
        .chars()
        .any(|c| c.is_control() && c != '\t' && c != '\n')
    {
        return Err(PasswordPolicyError::InvalidCharacter);
    }

    if is_predictable(password) {
        return Err(PasswordPolicyError::CommonPattern);
    }

    Ok(())
}

fn is_predictable(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    let first = chars.next();
    let single_repeated = chars.all(|c| Some(c) == first);

    single_repeated
        || is_digit_run(&lower)
        || KEYBOARD_ROWS.iter().any(|row| lower.contains(row))
        || TOP_PASSWORDS.contains(&lower.as_str())
}

/// Four or more digits counting up or down by one, wrapping 9↔0
///
/// Only the digits are considered, so `"1a2b3c4d"` counts as a run.
fn is_digit_run(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 {
        return false;
    }

    let step = |a: u32, b: u32| (b + 10 - a) % 10;
    let up = digits.windows(2).all(|w| step(w[0], w[1]) == 1);
    let down = digits.windows(2).all(|w| step(w[0], w[1]) == 9);
    up || down
}
