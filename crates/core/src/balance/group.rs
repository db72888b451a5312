//! Per-group ledger: every member's net position within one group.
//!
//! Plain double-entry netting with no debt simplification. Each expense
//! moves every non-payer share from the participant to the payer. A
//! settlement is the reverse movement: paying raises the payer's position
//! and lowers the recipient's. The ledger always sums to exactly zero.
//! A record whose transfers would leave the decimal range is skipped whole.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use splitledger_shared::types::{GroupId, UserId};
use tracing::debug;

use super::error::{RecordError, RecordRef};
use super::records::{check_expense, check_settlement, reject};
use super::types::GroupLedger;
use crate::expense::{Expense, Settlement};

/// Computes the net position of every member of `group_id`.
///
/// Every member starts at zero. Records from another group, or naming a
/// user outside `members`, are logged and skipped along with any other
/// malformed record.
#[must_use]
pub fn compute_group_ledger(
    group_id: GroupId,
    members: impl IntoIterator<Item = UserId>,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> GroupLedger {
    let mut balances: BTreeMap<UserId, Decimal> = members
        .into_iter()
        .map(|member| (member, Decimal::ZERO))
        .collect();
    let mut rejected = Vec::new();

    for expense in expenses {
        if let Err(err) = check_expense(expense)
            .and_then(|()| check_expense_in_group(group_id, &balances, expense))
        {
            reject(&mut rejected, err);
            continue;
        }

        let transfers = expense
            .splits
            .iter()
            .filter(|split| split.participant_id != expense.payer_id)
            .map(|split| (split.participant_id, expense.payer_id, split.amount));
        if let Err(err) = apply_transfers(&mut balances, RecordRef::Expense(expense.id), transfers)
        {
            reject(&mut rejected, err);
        }
    }

    for settlement in settlements {
        if let Err(err) = check_settlement(settlement)
            .and_then(|()| check_settlement_in_group(group_id, &balances, settlement))
        {
            reject(&mut rejected, err);
            continue;
        }

        let transfer = [(settlement.to_id, settlement.from_id, settlement.amount)];
        if let Err(err) =
            apply_transfers(&mut balances, RecordRef::Settlement(settlement.id), transfer)
        {
            reject(&mut rejected, err);
        }
    }

    debug!(
        %group_id,
        members = balances.len(),
        rejected = rejected.len(),
        "Computed group ledger"
    );

    GroupLedger {
        group_id,
        balances,
        rejected,
    }
}

/// Applies one record's `(debtor, creditor, amount)` transfers atomically.
///
/// Each transfer moves `amount` of position from debtor to creditor. If any
/// position would leave the decimal range, nothing is applied.
fn apply_transfers(
    balances: &mut BTreeMap<UserId, Decimal>,
    record: RecordRef,
    transfers: impl IntoIterator<Item = (UserId, UserId, Decimal)>,
) -> Result<(), RecordError> {
    let overflow = || RecordError::AmountOverflow { record };
    let mut staged: BTreeMap<UserId, Decimal> = BTreeMap::new();

    for (debtor, creditor, amount) in transfers {
        let debit = position(balances, &staged, debtor)
            .checked_sub(amount)
            .ok_or_else(overflow)?;
        staged.insert(debtor, debit);

        let credit = position(balances, &staged, creditor)
            .checked_add(amount)
            .ok_or_else(overflow)?;
        staged.insert(creditor, credit);
    }

    balances.extend(staged);
    Ok(())
}

fn position(
    balances: &BTreeMap<UserId, Decimal>,
    staged: &BTreeMap<UserId, Decimal>,
    user: UserId,
) -> Decimal {
    staged
        .get(&user)
        .or_else(|| balances.get(&user))
        .copied()
        .unwrap_or_default()
}

fn check_expense_in_group(
    group_id: GroupId,
    members: &BTreeMap<UserId, Decimal>,
    expense: &Expense,
) -> Result<(), RecordError> {
    let record = RecordRef::Expense(expense.id);

    if expense.group_id != Some(group_id) {
        return Err(RecordError::GroupMismatch {
            record,
            expected: group_id,
            actual: expense.group_id,
        });
    }

    let involved =
        std::iter::once(expense.payer_id).chain(expense.splits.iter().map(|s| s.participant_id));
    ensure_members(record, members, involved)
}

fn check_settlement_in_group(
    group_id: GroupId,
    members: &BTreeMap<UserId, Decimal>,
    settlement: &Settlement,
) -> Result<(), RecordError> {
    let record = RecordRef::Settlement(settlement.id);

    if settlement.group_id != Some(group_id) {
        return Err(RecordError::GroupMismatch {
            record,
            expected: group_id,
            actual: settlement.group_id,
        });
    }

    ensure_members(record, members, [settlement.from_id, settlement.to_id])
}

fn ensure_members(
    record: RecordRef,
    members: &BTreeMap<UserId, Decimal>,
    users: impl IntoIterator<Item = UserId>,
) -> Result<(), RecordError> {
    match users.into_iter().find(|user| !members.contains_key(user)) {
        Some(user_id) => Err(RecordError::UnknownParticipant { record, user_id }),
        None => Ok(()),
    }
}
