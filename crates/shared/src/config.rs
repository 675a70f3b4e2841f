//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Aggregation limits and defaults.
    #[serde(default)]
    pub report: ReportSettings,
    /// Locale formatting settings.
    #[serde(default)]
    pub formatting: FormatSettings,
    /// Artifact delivery settings.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Aggregation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Reject snapshots larger than this before any work starts.
    #[serde(default = "default_max_records")]
    pub max_records: Option<usize>,
    /// Number of ranked contributors kept in member reports.
    #[serde(default = "default_top_contributors_limit")]
    pub top_contributors_limit: usize,
}

fn default_max_records() -> Option<usize> {
    Some(100_000)
}

fn default_top_contributors_limit() -> usize {
    10
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            top_contributors_limit: default_top_contributors_limit(),
        }
    }
}

/// Locale formatting settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatSettings {
    /// Currency every amount is reported in.
    #[serde(default)]
    pub currency: Currency,
    /// IANA timezone used for calendar boundaries and printed dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Digit glyphs: `western` or `arabic_indic`.
    #[serde(default = "default_numerals")]
    pub numerals: String,
    /// Organization name printed as the document subtitle.
    #[serde(default = "default_organization")]
    pub organization: String,
}

fn default_timezone() -> String {
    "Asia/Riyadh".to_string()
}

fn default_numerals() -> String {
    "western".to_string()
}

fn default_organization() -> String {
    "نظام رصيد للتقارير المالية".to_string()
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            timezone: default_timezone(),
            numerals: default_numerals(),
            organization: default_organization(),
        }
    }
}

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::LocalFs {
            root: PathBuf::from("./storage"),
        }
    }
}

impl StorageProvider {
    /// Create S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Short provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }
}

/// Artifact delivery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend the artifacts are written to.
    #[serde(default)]
    pub provider: StorageProvider,
    /// Base URL that serves stored objects publicly, without trailing slash.
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Maximum artifact size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Presigned download URL TTL in seconds.
    #[serde(default = "default_download_ttl")]
    pub download_ttl_secs: u64,
}

fn default_max_file_size() -> u64 {
    25 * 1024 * 1024
}

fn default_download_ttl() -> u64 {
    3600 // 1 hour
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            public_base_url: None,
            max_file_size: default_max_file_size(),
            download_ttl_secs: default_download_ttl(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Every setting has a default, so a missing `config/` directory is fine.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("RASID")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
