//! Expense and settlement lifecycle.
//!
//! Builds validated records from drafts and enforces that only the owner
//! (the payer) may replace or delete a record.

pub mod error;
pub mod service;
pub mod types;

pub use error::ExpenseError;
pub use service::ExpenseService;
pub use types::{Expense, ExpenseCategory, ExpenseDraft, Settlement, SettlementDraft};
