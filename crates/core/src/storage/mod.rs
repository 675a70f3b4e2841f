//! Artifact delivery using Apache OpenDAL.
//!
//! Rendered documents are written once to vendor-agnostic object storage:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ op.write_with("key", data) │ op.presign_read("key", duration)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The returned URL is `{public_base_url}/{key}` when a public base is
//! configured, otherwise a presigned read URL, otherwise (local filesystem)
//! a `file://` URL.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{DeliveryAdapter, StorageService, report_destination};
