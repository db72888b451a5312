//! Core business logic for SplitLedger.
//!
//! This crate contains pure computation with ZERO I/O, web, or database
//! dependencies. Callers hand in immutable record snapshots and get values back.
//!
//! # Modules
//!
//! - `split` - Split allocation and expense validation
//! - `expense` - Expense and settlement lifecycle with owner checks
//! - `balance` - Per-user and per-group balance aggregation

pub mod balance;
pub mod expense;
pub mod split;
