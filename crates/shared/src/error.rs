//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Lower layers keep their own error enums; callers at the edge of the system
/// collapse them into this shape to get a stable error code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input rejected before any computation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document rendering failed.
    #[error("Render error: {0}")]
    Render(String),

    /// The delivery adapter failed to store the artifact.
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for caller-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Render(_) => "RENDER_ERROR",
            Self::Delivery(_) => "DELIVERY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the caller can fix the problem by changing its input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Configuration(String::new()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(AppError::Render(String::new()).error_code(), "RENDER_ERROR");
        assert_eq!(
            AppError::Delivery(String::new()).error_code(),
            "DELIVERY_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Render("msg".into()).to_string(),
            "Render error: msg"
        );
        assert_eq!(
            AppError::Delivery("msg".into()).to_string(),
            "Delivery error: msg"
        );
    }

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(AppError::Validation(String::new()).is_client_error());
        assert!(!AppError::Render(String::new()).is_client_error());
        assert!(!AppError::Delivery(String::new()).is_client_error());
    }
}
