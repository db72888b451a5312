//! Property-based tests for balance aggregation.
//!
//! - Group ledger zero-sum
//! - Overall balance is the sum of per-group nets
//! - Per-user and per-group views agree within a single group

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use splitledger_shared::types::{ExpenseId, GroupId, SettlementId, UserId};

use super::group::compute_group_ledger;
use super::types::UngroupedPolicy;
use super::user::compute_user_balances;
use crate::expense::{Expense, ExpenseCategory, Settlement};
use crate::split::AllocatedSplit;

const MEMBERS: usize = 5;

/// Expense shape: payer index and participant index to share in cents.
type ExpenseShape = (usize, BTreeMap<usize, i64>);

/// Settlement shape: from index, to index, amount in cents.
type SettlementShape = (usize, usize, i64);

fn expense_shapes() -> impl Strategy<Value = Vec<ExpenseShape>> {
    prop::collection::vec(
        (
            0..MEMBERS,
            prop::collection::btree_map(0..MEMBERS, 1i64..1_000_000i64, 1..=MEMBERS),
        ),
        0..15,
    )
}

fn settlement_shapes() -> impl Strategy<Value = Vec<SettlementShape>> {
    prop::collection::vec(
        (0..MEMBERS, 0..MEMBERS, 1i64..500_000i64).prop_filter("distinct parties", |(f, t, _)| f != t),
        0..10,
    )
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn build_expenses(
    users: &[UserId],
    group_id: Option<GroupId>,
    shapes: &[ExpenseShape],
) -> Vec<Expense> {
    shapes
        .iter()
        .map(|(payer, shares)| {
            let splits: Vec<_> = shares
                .iter()
                .map(|(idx, cents)| AllocatedSplit::new(users[*idx], Decimal::new(*cents, 2)))
                .collect();
            Expense {
                id: ExpenseId::new(),
                description: "Generated".to_string(),
                amount: splits.iter().map(|s| s.amount).sum(),
                payer_id: users[*payer],
                group_id,
                splits,
                category: ExpenseCategory::General,
                date: date(),
            }
        })
        .collect()
}

fn build_settlements(
    users: &[UserId],
    group_id: Option<GroupId>,
    shapes: &[SettlementShape],
) -> Vec<Settlement> {
    shapes
        .iter()
        .map(|(from, to, cents)| Settlement {
            id: SettlementId::new(),
            from_id: users[*from],
            to_id: users[*to],
            amount: Decimal::new(*cents, 2),
            group_id,
            date: date(),
        })
        .collect()
}

fn members() -> Vec<UserId> {
    (0..MEMBERS).map(|_| UserId::new()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A group ledger always sums to exactly zero.
    #[test]
    fn prop_group_ledger_zero_sum(
        expenses in expense_shapes(),
        settlements in settlement_shapes(),
    ) {
        let users = members();
        let group = GroupId::new();
        let expenses = build_expenses(&users, Some(group), &expenses);
        let settlements = build_settlements(&users, Some(group), &settlements);

        let ledger = compute_group_ledger(group, users.iter().copied(), &expenses, &settlements);

        prop_assert!(ledger.rejected.is_empty());
        prop_assert_eq!(ledger.balances.len(), MEMBERS);
        prop_assert_eq!(ledger.total(), Some(Decimal::ZERO));
    }

    /// `overall` equals the sum of per-group nets, across several groups.
    #[test]
    fn prop_overall_is_sum_of_nets(
        first in expense_shapes(),
        second in expense_shapes(),
        settlements in settlement_shapes(),
        include_ungrouped in any::<bool>(),
    ) {
        let users = members();
        let mut expenses = build_expenses(&users, Some(GroupId::new()), &first);
        expenses.extend(build_expenses(&users, None, &second));
        let settlements = build_settlements(&users, Some(GroupId::new()), &settlements);
        let policy = if include_ungrouped {
            UngroupedPolicy::SyntheticBucket
        } else {
            UngroupedPolicy::Exclude
        };

        for user in &users {
            let balances = compute_user_balances(*user, &expenses, &settlements, policy);
            let nets: Decimal = balances.per_group.iter().map(|b| b.net).sum();
            prop_assert_eq!(balances.overall, nets);
            for bucket in &balances.per_group {
                prop_assert_eq!(bucket.net, bucket.total_owed_to_user - bucket.total_user_owes);
            }
        }
    }

    /// Within one group, each member's net equals their ledger position.
    #[test]
    fn prop_user_view_agrees_with_group_ledger(
        expenses in expense_shapes(),
        settlements in settlement_shapes(),
    ) {
        let users = members();
        let group = GroupId::new();
        let expenses = build_expenses(&users, Some(group), &expenses);
        let settlements = build_settlements(&users, Some(group), &settlements);

        let ledger = compute_group_ledger(group, users.iter().copied(), &expenses, &settlements);

        for user in &users {
            let balances =
                compute_user_balances(*user, &expenses, &settlements, UngroupedPolicy::Exclude);
            prop_assert_eq!(balances.overall, ledger.balance_of(*user));
        }
    }
}
