//! Payment record schema and snapshot ingestion.
//!
//! Upstream records arrive loosely typed. Ingestion maps them onto the
//! explicit [`PaymentRecord`] schema, coercing bad fields to safe defaults
//! and recording an [`IngestWarning`] for each coercion.

pub mod ingest;
pub mod types;

pub use ingest::{IngestWarning, RawPaymentRecord, RecordSnapshot};
pub use types::{OTHER_CATEGORY, PaymentRecord, PaymentStatus};
