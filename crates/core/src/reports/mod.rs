//! Report aggregation.
//!
//! Builds an immutable [`Report`] from a record snapshot:
//! - Summary counts and amounts
//! - Status, category and method breakdowns
//! - Member contributions
//! - Overdue buckets
//! - Period-over-period trends
//! - Forensic anomalies and recommendations
//! - Chart-ready monthly series

mod anomaly;
pub mod error;
pub mod service;
pub mod types;


pub use anomaly::{AnomalyDetector, recommendations_for};
pub use error::ReportError;
pub use service::ReportAggregator;
pub use types::*;
