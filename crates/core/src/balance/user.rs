//! Per-user balances across groups.
//!
//! Every expense and settlement touching the user lands in the bucket of
//! its group:
//! - user paid an expense: everyone else's share is owed to the user
//! - someone else paid: the user's own share is owed by the user
//! - user paid a settlement: counts as owed to the user, cancelling debt
//! - user received a settlement: counts as owed by the user, cancelling claims

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use splitledger_shared::types::{GroupId, UserId};
use tracing::debug;

use super::error::{RecordError, RecordRef};
use super::records::{check_expense, check_settlement, reject};
use super::types::{GroupBalance, UngroupedPolicy, UserBalances};
use crate::expense::{Expense, Settlement};

type Buckets = BTreeMap<Option<GroupId>, GroupBalance>;

/// Computes one user's balance per counterpart group and overall.
///
/// Only records involving the user are considered, and non-group records
/// are excluded unless `policy` is [`UngroupedPolicy::SyntheticBucket`].
/// Malformed records, and records whose amounts would push a total out of
/// the decimal range, are logged and skipped. `overall` is the exact sum of
/// the per-group `net` values.
#[must_use]
pub fn compute_user_balances(
    user_id: UserId,
    expenses: &[Expense],
    settlements: &[Settlement],
    policy: UngroupedPolicy,
) -> UserBalances {
    let mut buckets = Buckets::new();
    let mut rejected = Vec::new();

    for expense in expenses {
        let involved = expense.payer_id == user_id || expense.share_of(user_id).is_some();
        if !policy.includes(expense.group_id) || !involved {
            continue;
        }
        if let Err(err) = check_expense(expense) {
            reject(&mut rejected, err);
            continue;
        }

        let applied = if expense.payer_id == user_id {
            owed_by_others(expense, user_id).and_then(|owed| {
                apply(&mut buckets, expense.group_id, |b| {
                    b.checked_add_owed_to_user(owed)
                })
            })
        } else {
            expense.share_of(user_id).map_or(Some(()), |share| {
                apply(&mut buckets, expense.group_id, |b| b.checked_add_user_owes(share))
            })
        };
        if applied.is_none() {
            let record = RecordRef::Expense(expense.id);
            reject(&mut rejected, RecordError::AmountOverflow { record });
        }
    }

    for settlement in settlements {
        let involved = settlement.from_id == user_id || settlement.to_id == user_id;
        if !policy.includes(settlement.group_id) || !involved {
            continue;
        }
        if let Err(err) = check_settlement(settlement) {
            reject(&mut rejected, err);
            continue;
        }

        let amount = settlement.amount;
        let applied = if settlement.from_id == user_id {
            apply(&mut buckets, settlement.group_id, |b| {
                b.checked_add_owed_to_user(amount)
            })
        } else {
            apply(&mut buckets, settlement.group_id, |b| b.checked_add_user_owes(amount))
        };
        if applied.is_none() {
            let record = RecordRef::Settlement(settlement.id);
            reject(&mut rejected, RecordError::AmountOverflow { record });
        }
    }

    // apply() never leaves the total out of range
    let overall = total_net(&buckets).unwrap_or_default();
    let per_group: Vec<GroupBalance> = buckets.into_values().collect();

    debug!(
        %user_id,
        groups = per_group.len(),
        %overall,
        rejected = rejected.len(),
        "Computed user balances"
    );

    UserBalances {
        user_id,
        overall,
        per_group,
        rejected,
    }
}

/// Sum of every other participant's share on an expense the user paid.
fn owed_by_others(expense: &Expense, user_id: UserId) -> Option<Decimal> {
    expense
        .splits
        .iter()
        .filter(|split| split.participant_id != user_id)
        .map(|split| split.amount)
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Updates one bucket, keeping the buckets and their total in range.
///
/// Returns `None` and leaves `buckets` untouched if the update overflows.
fn apply(
    buckets: &mut Buckets,
    group_id: Option<GroupId>,
    update: impl FnOnce(&GroupBalance) -> Option<GroupBalance>,
) -> Option<()> {
    let current = buckets
        .get(&group_id)
        .copied()
        .unwrap_or_else(|| GroupBalance::new(group_id));
    let updated = update(&current)?;

    let previous = buckets.insert(group_id, updated);
    if total_net(buckets).is_none() {
        match previous {
            Some(previous) => buckets.insert(group_id, previous),
            None => buckets.remove(&group_id),
        };
        return None;
    }

    Some(())
}

fn total_net(buckets: &Buckets) -> Option<Decimal> {
    buckets
        .values()
        .map(|b| b.net)
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}
