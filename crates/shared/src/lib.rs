//! Shared types, errors, and configuration for SplitLedger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for users, groups, expenses, and settlements
//! - Money rounding and the split reconciliation tolerance
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerConfig, LogConfig};
pub use error::{AppError, AppResult};
