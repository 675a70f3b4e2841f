//! Storage configuration types.

use rasid_shared::config::StorageSettings;
pub use rasid_shared::config::StorageProvider;

use crate::render::ExportFormat;

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Base URL that serves stored objects publicly.
    pub public_base_url: Option<String>,
    /// Maximum artifact size in bytes.
    pub max_file_size: u64,
    /// Presigned download URL TTL in seconds (default: 3600 = 1 hour).
    pub presign_download_ttl_secs: u64,
    /// Allowed MIME types for delivery.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 25MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;
    /// Default download TTL: 1 hour.
    pub const DEFAULT_DOWNLOAD_TTL: u64 = 3600;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            public_base_url: None,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            presign_download_ttl_secs: Self::DEFAULT_DOWNLOAD_TTL,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Build from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self {
            provider: settings.provider.clone(),
            public_base_url: settings.public_base_url.clone(),
            max_file_size: settings.max_file_size,
            presign_download_ttl_secs: settings.download_ttl_secs,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Set the public base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.public_base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set presigned download URL TTL.
    #[must_use]
    pub fn with_download_ttl(mut self, secs: u64) -> Self {
        self.presign_download_ttl_secs = secs;
        self
    }

    /// MIME types of the rendered formats.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        [ExportFormat::Pdf, ExportFormat::Xlsx]
            .iter()
            .map(|format| format.content_type().to_string())
            .collect()
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }
}
