//! Delivery error types.

use thiserror::Error;

/// Errors raised while delivering an artifact to storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Artifact exceeds the configured size limit.
    #[error("artifact size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual artifact size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Content type is not one of the rendered formats.
    #[error("content type '{mime_type}' is not deliverable")]
    InvalidMimeType {
        /// The rejected content type.
        mime_type: String,
    },

    /// Object not found in storage.
    #[error("object not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// The provider cannot produce a retrievable URL for the stored object.
    #[error("storage provider cannot produce a download URL")]
    PresignNotSupported,

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Destination key is empty or escapes the storage root.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// True when the artifact itself was rejected before any write.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::FileTooLarge { .. } | Self::InvalidMimeType { .. } | Self::InvalidKey(_)
        )
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            opendal::ErrorKind::Unsupported => Self::PresignNotSupported,
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections() {
        assert!(StorageError::file_too_large(10, 5).is_rejection());
        assert!(StorageError::invalid_mime_type("text/csv").is_rejection());
        assert!(StorageError::invalid_key("../x").is_rejection());
        assert!(!StorageError::operation("io").is_rejection());
        assert!(!StorageError::PresignNotSupported.is_rejection());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StorageError::file_too_large(10, 5).to_string(),
            "artifact size 10 bytes exceeds maximum allowed 5 bytes"
        );
    }
}
