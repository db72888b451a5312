//! Errors for malformed historical records met during aggregation.
//!
//! These never fail a balance query. The offending record is logged,
//! left out of the totals, and reported back in the result.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use splitledger_shared::types::{ExpenseId, GroupId, SettlementId, UserId};
use thiserror::Error;

/// Identifies the record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum RecordRef {
    /// An expense record.
    Expense(ExpenseId),
    /// A settlement record.
    Settlement(SettlementId),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense(id) => write!(f, "expense {id}"),
            Self::Settlement(id) => write!(f, "settlement {id}"),
        }
    }
}

/// A record that cannot be folded into a balance.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    /// Record amount is zero or negative.
    #[error("{record} has non-positive amount {amount}")]
    NonPositiveAmount {
        /// The offending record.
        record: RecordRef,
        /// The stored amount.
        amount: Decimal,
    },

    /// Expense has no splits.
    #[error("{record} has no splits")]
    EmptySplits {
        /// The offending record.
        record: RecordRef,
    },

    /// Expense lists a participant more than once.
    #[error("{record} lists participant {participant_id} more than once")]
    DuplicateParticipant {
        /// The offending record.
        record: RecordRef,
        /// The repeated participant.
        participant_id: UserId,
    },

    /// Settlement pays the same user it comes from.
    #[error("{record} is a payment from user {user_id} to themselves")]
    SelfSettlement {
        /// The offending record.
        record: RecordRef,
        /// The user on both sides.
        user_id: UserId,
    },

    /// Record belongs to a different group than the one being aggregated.
    #[error("{record} belongs to group {actual:?}, not {expected}")]
    GroupMismatch {
        /// The offending record.
        record: RecordRef,
        /// The group being aggregated.
        expected: GroupId,
        /// The group on the record.
        actual: Option<GroupId>,
    },

    /// Folding the record in would overflow the decimal range.
    #[error("{record} has amounts too large to aggregate")]
    AmountOverflow {
        /// The offending record.
        record: RecordRef,
    },

    /// Record references a user who is not a member of the group.
    #[error("{record} references user {user_id} who is not a group member")]
    UnknownParticipant {
        /// The offending record.
        record: RecordRef,
        /// The unknown user.
        user_id: UserId,
    },
}

impl RecordError {
    /// Returns the record this error refers to.
    #[must_use]
    pub fn record(&self) -> RecordRef {
        match self {
            Self::NonPositiveAmount { record, .. }
            | Self::EmptySplits { record }
            | Self::DuplicateParticipant { record, .. }
            | Self::SelfSettlement { record, .. }
            | Self::GroupMismatch { record, .. }
            | Self::AmountOverflow { record }
            | Self::UnknownParticipant { record, .. } => *record,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount { .. } => "RECORD_NON_POSITIVE_AMOUNT",
            Self::EmptySplits { .. } => "RECORD_EMPTY_SPLITS",
            Self::DuplicateParticipant { .. } => "RECORD_DUPLICATE_PARTICIPANT",
            Self::SelfSettlement { .. } => "RECORD_SELF_SETTLEMENT",
            Self::GroupMismatch { .. } => "RECORD_GROUP_MISMATCH",
            Self::AmountOverflow { .. } => "RECORD_AMOUNT_OVERFLOW",
            Self::UnknownParticipant { .. } => "RECORD_UNKNOWN_PARTICIPANT",
        }
    }
}
