//! Core reporting logic for Rasid.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Records come in as an immutable snapshot; reports and artifacts are values
//! built fresh on every call.
//!
//! # Modules
//!
//! - `payment` - Record schema and loosely-typed ingestion
//! - `period` - Named and custom reporting periods
//! - `classify` - Key-based bucketing with exact percentage shares
//! - `trend` - Period-over-period deltas
//! - `reports` - Report aggregation and forensic anomaly detection
//! - `formatting` - Currency, bilingual dates, numerals and labels
//! - `render` - PDF and XLSX document rendering
//! - `storage` - Artifact delivery via OpenDAL
//! - `export` - The validate, aggregate, render, deliver pipeline

pub mod classify;
pub mod export;
pub mod formatting;
pub mod payment;
pub mod period;
pub mod render;
pub mod reports;
pub mod storage;
pub mod trend;
