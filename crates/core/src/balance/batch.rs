//! Per-user balances for many users at once.

use rayon::prelude::*;
use splitledger_shared::types::UserId;
use tracing::debug;

use super::types::{UngroupedPolicy, UserBalances};
use super::user::compute_user_balances;
use crate::expense::{Expense, Settlement};

/// Computes [`compute_user_balances`] for every user in parallel.
///
/// The record slices are shared read-only across workers. Results come back
/// in the same order as `user_ids`.
#[must_use]
pub fn compute_many_user_balances(
    user_ids: &[UserId],
    expenses: &[Expense],
    settlements: &[Settlement],
    policy: UngroupedPolicy,
) -> Vec<UserBalances> {
    debug!(
        users = user_ids.len(),
        expenses = expenses.len(),
        settlements = settlements.len(),
        "Computing balances for many users"
    );

    user_ids
        .par_iter()
        .map(|&user_id| compute_user_balances(user_id, expenses, settlements, policy))
        .collect()
}
