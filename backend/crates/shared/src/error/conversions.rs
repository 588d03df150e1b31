//! Classification of foreign errors into [`AppError`]
//!
//! Stores need to tell a uniqueness violation apart from every other
//! database failure. JSON failures split into bad input and our own bugs.

use super::app_error::AppError;

/// 400 when the input was not the JSON we expected, 500 when writing failed
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let base = if err.is_io() {
            AppError::internal("JSON serialization error")
        } else {
            AppError::bad_request("Bad JSON request")
        };
        base.with_source(err)
    }
}

/// SQLSTATE `unique_violation`
#[cfg(feature = "sqlx")]
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// Did this statement lose a race on a unique index?
#[cfg(feature = "sqlx")]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == PG_UNIQUE_VIOLATION)
}

/// 409 for unique violations, 404 for a missing row, 500 otherwise
#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let base = if is_unique_violation(&err) {
            AppError::conflict("Duplicate key value")
        } else if matches!(err, sqlx::Error::RowNotFound) {
            AppError::not_found("Record not found")
        } else {
            AppError::internal("Database error")
        };
        base.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;
    use std::error::Error;

    #[test]
    fn test_malformed_json_is_400() {
        for input in ["{\"username\":", "not json", "[1, 2"] {
            let err: AppError = serde_json::from_str::<serde_json::Value>(input)
                .unwrap_err()
                .into();
            assert_eq!(err.kind(), ErrorKind::BadRequest, "{input}");
            assert_eq!(err.public_message(), "Bad JSON request");
            assert!(err.source().is_some());
        }

        let wrong_shape: AppError = serde_json::from_str::<Vec<u8>>("{}").unwrap_err().into();
        assert_eq!(wrong_shape.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_json_write_failure_is_500() {
        struct Broken;
        impl std::io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err: AppError = serde_json::to_writer(Broken, &[1, 2, 3]).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_row_not_found_is_404() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));

        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert_eq!(err.public_message(), "Internal Server Error");
    }
}
