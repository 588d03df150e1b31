//! Security primitives with no knowledge of users or HTTP routes
//!
//! - [`password`]: Argon2id hashing and the registration password policy
//! - [`crypto`]: CSPRNG tokens, HMAC-SHA256, base64url
//! - [`cookie`]: `Set-Cookie` rendering and `Cookie` lookup

pub mod cookie;
pub mod crypto;
pub mod password;
