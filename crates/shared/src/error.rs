//! Application-wide error types.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// A dependency such as the object store is unavailable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The operation did not finish before its deadline.
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ServiceUnavailable(_) => 503,
            Self::Timeout(_) => 504,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(
            AppError::ServiceUnavailable(String::new()).status_code(),
            503
        );
        assert_eq!(AppError::Timeout(String::new()).status_code(), 504);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::ServiceUnavailable(String::new()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(AppError::Timeout(String::new()).error_code(), "TIMEOUT");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Database("msg".into()).to_string(),
            "Database error: msg"
        );
        assert_eq!(
            AppError::ServiceUnavailable("msg".into()).to_string(),
            "Service unavailable: msg"
        );
        assert_eq!(AppError::Timeout("msg".into()).to_string(), "Timed out: msg");
    }
}
