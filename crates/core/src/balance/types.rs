//! Balance result types.
//!
//! The global view and the group view have different shapes:
//! [`UserBalances`] is keyed by counterpart group for one user, while
//! [`GroupLedger`] is a flat net position per member of one group.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use splitledger_shared::LedgerConfig;
use splitledger_shared::types::{GroupId, UserId};

use super::error::RecordError;

/// Whether non-group records take part in the per-user view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UngroupedPolicy {
    /// Non-group expenses and settlements are left out entirely.
    #[default]
    Exclude,
    /// Non-group records are folded into a bucket with no group id.
    SyntheticBucket,
}

impl UngroupedPolicy {
    /// Returns true if a record with this group id is aggregated.
    #[must_use]
    pub const fn includes(self, group_id: Option<GroupId>) -> bool {
        group_id.is_some() || matches!(self, Self::SyntheticBucket)
    }
}

impl From<&LedgerConfig> for UngroupedPolicy {
    fn from(config: &LedgerConfig) -> Self {
        if config.include_ungrouped {
            Self::SyntheticBucket
        } else {
            Self::Exclude
        }
    }
}

/// A user's position within one counterpart group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupBalance {
    /// The group, or `None` for the synthetic non-group bucket.
    pub group_id: Option<GroupId>,
    /// What others owe the user.
    pub total_owed_to_user: Decimal,
    /// What the user owes others.
    pub total_user_owes: Decimal,
    /// `total_owed_to_user - total_user_owes`; positive means the user is owed.
    pub net: Decimal,
}

impl GroupBalance {
    /// Creates an empty balance for a group.
    #[must_use]
    pub const fn new(group_id: Option<GroupId>) -> Self {
        Self {
            group_id,
            total_owed_to_user: Decimal::ZERO,
            total_user_owes: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    /// Returns this balance with `amount` added to what the user is owed,
    /// or `None` if any total would leave the decimal range.
    #[must_use]
    pub fn checked_add_owed_to_user(&self, amount: Decimal) -> Option<Self> {
        let total_owed_to_user = self.total_owed_to_user.checked_add(amount)?;
        self.with_totals(total_owed_to_user, self.total_user_owes)
    }

    /// Returns this balance with `amount` added to what the user owes, or
    /// `None` if any total would leave the decimal range.
    #[must_use]
    pub fn checked_add_user_owes(&self, amount: Decimal) -> Option<Self> {
        let total_user_owes = self.total_user_owes.checked_add(amount)?;
        self.with_totals(self.total_owed_to_user, total_user_owes)
    }

    fn with_totals(&self, total_owed_to_user: Decimal, total_user_owes: Decimal) -> Option<Self> {
        Some(Self {
            group_id: self.group_id,
            total_owed_to_user,
            total_user_owes,
            net: total_owed_to_user.checked_sub(total_user_owes)?,
        })
    }
}

/// Balances for one user across every group they take part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserBalances {
    /// The user.
    pub user_id: UserId,
    /// Sum of `net` over `per_group`.
    pub overall: Decimal,
    /// One entry per group, ordered by group id (the non-group bucket first).
    pub per_group: Vec<GroupBalance>,
    /// Records left out because they were malformed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RecordError>,
}

impl UserBalances {
    /// Returns the balance for a group, if the user has one there.
    #[must_use]
    pub fn group(&self, group_id: Option<GroupId>) -> Option<&GroupBalance> {
        self.per_group.iter().find(|b| b.group_id == group_id)
    }
}

/// Net position of every member within one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupLedger {
    /// The group.
    pub group_id: GroupId,
    /// Member id to signed net position; positive means the group owes them.
    pub balances: BTreeMap<UserId, Decimal>,
    /// Records left out because they were malformed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RecordError>,
}

impl GroupLedger {
    /// Returns a member's position, zero for unknown users.
    #[must_use]
    pub fn balance_of(&self, user_id: UserId) -> Decimal {
        self.balances.get(&user_id).copied().unwrap_or_default()
    }

    /// Sum of every member's position. Zero for any consistent ledger.
    ///
    /// Returns `None` if a partial sum leaves the decimal range.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.balances
            .values()
            .try_fold(Decimal::ZERO, |sum, position| sum.checked_add(*position))
    }
}
