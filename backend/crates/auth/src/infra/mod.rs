//! Infrastructure Layer
//!
//! Storage backends and outbound provider clients.

pub mod memory;
pub mod oauth;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use oauth::{OAuthClient, ProviderSpec};
pub use postgres::PgUserRepository;
