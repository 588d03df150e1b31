//! Randomness, HMAC and base64url helpers for signed cookies and secrets

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

/// `len` bytes from the OS CSPRNG
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// base64url of `len` random bytes, safe to put in a URL or cookie unescaped
pub fn random_token(len: usize) -> String {
    to_base64_url(&random_bytes(len))
}

pub fn to_base64_url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}

pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Equality whose running time depends only on the lengths
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_token_shape() {
        // 32 bytes encode to 43 characters without padding
        let token = random_token(32);
        assert_eq!(token.len(), 43);
        assert!(token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        assert_ne!(token, random_token(32));
        assert_eq!(random_bytes(0), Vec::<u8>::new());
    }

    #[test]
    fn test_base64_url_alphabet() {
        let encoded = to_base64_url(&[0xfb, 0xff, 0xbf]);
        assert_eq!(encoded, "-_-_");
        assert_eq!(from_base64_url(&encoded).unwrap(), [0xfb, 0xff, 0xbf]);
        assert!(from_base64_url("a+b/").is_err());
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"state", b"state"));
        assert!(!constant_time_eq(b"state", b"statf"));
        assert!(!constant_time_eq(b"state", b"stat"));
        assert!(constant_time_eq(b"", b""));
    }
}
