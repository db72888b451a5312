//! Expense and settlement records.
//!
//! Records are immutable once validated. An update produces a new record
//! with the same id and replaced splits; nothing is edited in place.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::{ExpenseId, GroupId, SettlementId, UserId};

use crate::split::{AllocatedSplit, ParticipantContribution};

/// Expense category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Uncategorised.
    #[default]
    General,
    /// Restaurants, takeaway.
    Food,
    /// Shared shopping.
    Groceries,
    /// Fuel, tickets, rides.
    Transport,
    /// Rent and household costs.
    Housing,
    /// Power, water, internet.
    Utilities,
    /// Events, subscriptions.
    Entertainment,
    /// Trips and accommodation.
    Travel,
    /// Anything else.
    Other,
}

/// A validated, fully allocated expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The expense ID.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// The total amount paid.
    pub amount: Decimal,
    /// The user who paid.
    pub payer_id: UserId,
    /// The group, or `None` for a non-group expense.
    pub group_id: Option<GroupId>,
    /// Per-participant shares.
    pub splits: Vec<AllocatedSplit>,
    /// Expense category.
    #[serde(default)]
    pub category: ExpenseCategory,
    /// Date of the expense.
    pub date: NaiveDate,
}

impl Expense {
    /// Returns the share owed by `participant`, if they have one.
    #[must_use]
    pub fn share_of(&self, participant: UserId) -> Option<Decimal> {
        self.splits
            .iter()
            .find(|split| split.participant_id == participant)
            .map(|split| split.amount)
    }
}

/// A payment from one user to another that reduces a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The settlement ID.
    pub id: SettlementId,
    /// The user paying.
    pub from_id: UserId,
    /// The user being paid.
    pub to_id: UserId,
    /// The amount paid.
    pub amount: Decimal,
    /// The group, or `None` for a non-group payment.
    pub group_id: Option<GroupId>,
    /// Date of the payment.
    pub date: NaiveDate,
}

/// Input for creating or replacing an expense.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    /// What the money was spent on.
    pub description: String,
    /// The total amount paid (must be positive).
    pub amount: Decimal,
    /// The user who paid.
    pub payer_id: UserId,
    /// The group, or `None` for a non-group expense.
    pub group_id: Option<GroupId>,
    /// Contributions to allocate.
    pub contributions: Vec<ParticipantContribution>,
    /// Expense category.
    pub category: ExpenseCategory,
    /// Date of the expense.
    pub date: NaiveDate,
}

/// Input for recording or replacing a settlement.
#[derive(Debug, Clone)]
pub struct SettlementDraft {
    /// The user paying.
    pub from_id: UserId,
    /// The user being paid.
    pub to_id: UserId,
    /// The amount paid (must be positive).
    pub amount: Decimal,
    /// The group, or `None` for a non-group payment.
    pub group_id: Option<GroupId>,
    /// Date of the payment.
    pub date: NaiveDate,
}
