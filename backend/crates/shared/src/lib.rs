//! `kernel`: vocabulary every crate in the workspace agrees on
//!
//! The error taxonomy, the unified [`error::app_error::AppError`], the
//! error channel that renders it (feature `axum`), and [`id::UserId`].

pub mod error {
    pub mod app_error;
    #[cfg(feature = "axum")]
    pub mod channel;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
