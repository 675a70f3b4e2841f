//! Shared types, errors, and configuration for Rasid.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for payments and members
//! - Currency codes with their display symbols
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
