//! Delivery adapter implementation using Apache OpenDAL.

use std::future::Future;
use std::time::Duration;

use opendal::{Operator, services};
use tracing::{debug, info};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Prefix under which rendered reports are stored.
const REPORTS_PREFIX: &str = "reports";

/// Persists an artifact and returns a retrievable URL.
///
/// One call writes the bytes exactly once; callers never retry through it.
pub trait DeliveryAdapter {
    /// Store `bytes` at `destination` and return a URL the caller can fetch.
    fn deliver(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        destination: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// Storage service backed by an OpenDAL operator.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Validate an artifact against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the size or content type is not deliverable.
    pub fn validate(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Resolve a retrievable URL for a stored key.
    ///
    /// Order: public base URL, presigned read, local `file://` path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PresignNotSupported`] when none applies.
    pub async fn resolve_url(&self, key: &str) -> Result<String, StorageError> {
        if let Some(base) = &self.config.public_base_url {
            return Ok(format!("{}/{key}", base.trim_end_matches('/')));
        }

        if self.operator.info().full_capability().presign_read {
            let ttl = Duration::from_secs(self.config.presign_download_ttl_secs);
            let presigned = self.operator.presign_read(key, ttl).await?;
            return Ok(presigned.uri().to_string());
        }

        if let StorageProvider::LocalFs { root } = &self.config.provider {
            let path = std::path::absolute(root.join(key))
                .map_err(|e| StorageError::operation(e.to_string()))?;
            return Ok(format!("file://{}", path.display()));
        }

        Err(StorageError::PresignNotSupported)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }
}

impl DeliveryAdapter for StorageService {
    async fn deliver(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        destination: &str,
    ) -> Result<String, StorageError> {
        let key = normalize_key(destination)?;
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        self.validate(content_type, size)?;

        debug!(key = %key, size, content_type, "writing artifact");

        if self.operator.info().full_capability().write_with_content_type {
            self.operator
                .write_with(&key, bytes)
                .content_type(content_type)
                .await?;
        } else {
            self.operator.write(&key, bytes).await?;
        }

        let url = self.resolve_url(&key).await?;

        info!(
            key = %key,
            size,
            provider = self.provider_name(),
            bucket = self.bucket(),
            "artifact delivered"
        );

        Ok(url)
    }
}

/// Storage destination for a rendered report: `reports/{sanitized_file_name}`.
#[must_use]
pub fn report_destination(file_name: &str) -> String {
    format!("{REPORTS_PREFIX}/{}", sanitize_filename(file_name))
}

/// Validate a destination key and sanitize each of its segments.
fn normalize_key(destination: &str) -> Result<String, StorageError> {
    let segments: Vec<&str> = destination
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(StorageError::invalid_key(destination));
    }

    Ok(segments
        .iter()
        .map(|segment| sanitize_filename(segment))
        .collect::<Vec<_>>()
        .join("/"))
}

/// Sanitize a file name for use in a storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
