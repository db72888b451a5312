//! Balance aggregation over immutable expense and settlement snapshots.
//!
//! Two independent views:
//! - Per-user balances keyed by counterpart group ([`compute_user_balances`])
//! - Per-group member positions ([`compute_group_ledger`])
//!
//! Malformed records never fail a query; they are logged and returned in
//! the result's `rejected` list.

pub mod batch;
pub mod error;
pub mod group;
mod records;
pub mod types;
pub mod user;

#[cfg(test)]
mod balance_props;

pub use batch::compute_many_user_balances;
pub use error::{RecordError, RecordRef};
pub use group::compute_group_ledger;
pub use types::{GroupBalance, GroupLedger, UngroupedPolicy, UserBalances};
pub use user::compute_user_balances;
