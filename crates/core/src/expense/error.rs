//! Expense lifecycle errors.

use rust_decimal::Decimal;
use splitledger_shared::AppError;
use splitledger_shared::types::UserId;
use thiserror::Error;

use crate::split::SplitError;

/// Errors that can occur while creating, replacing, or deleting records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Allocation or validation of the splits failed.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Record amount is zero or negative.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The payer is not allowed on this expense.
    #[error("Payer {0} is not eligible for this expense")]
    PayerNotEligible(UserId),

    /// Only the owner may update or delete the record.
    #[error("User {actor} is not the owner of this record (owner is {owner})")]
    NotOwner {
        /// The user attempting the change.
        actor: UserId,
        /// The record owner.
        owner: UserId,
    },

    /// A replacement tries to move the record to a different owner.
    #[error("Record owned by {owner} cannot be reassigned to {requested}")]
    OwnerChange {
        /// The current owner.
        owner: UserId,
        /// The owner named by the replacement.
        requested: UserId,
    },

    /// A settlement must be between two different users.
    #[error("User {0} cannot settle with themselves")]
    SelfSettlement(UserId),

    /// The caller recording a settlement is neither payer nor recipient.
    #[error("User {0} must be a party to the settlement")]
    InitiatorNotParty(UserId),

    /// A settlement party is not allowed in this scope.
    #[error("User {0} is not eligible for this settlement")]
    PartyNotEligible(UserId),
}

impl ExpenseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Split(err) => err.error_code(),
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::PayerNotEligible(_) => "PAYER_NOT_ELIGIBLE",
            Self::NotOwner { .. } => "NOT_OWNER",
            Self::OwnerChange { .. } => "OWNER_CHANGE",
            Self::SelfSettlement(_) => "SELF_SETTLEMENT",
            Self::InitiatorNotParty(_) => "INITIATOR_NOT_PARTY",
            Self::PartyNotEligible(_) => "PARTY_NOT_ELIGIBLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Split(err) => err.http_status_code(),
            Self::NonPositiveAmount(_) | Self::SelfSettlement(_) => 400,
            Self::NotOwner { .. } | Self::OwnerChange { .. } | Self::InitiatorNotParty(_) => 403,
            Self::PayerNotEligible(_) | Self::PartyNotEligible(_) => 422,
        }
    }
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::Split(err) => err.into(),
            ExpenseError::NonPositiveAmount(_) | ExpenseError::SelfSettlement(_) => {
                Self::Validation(err.to_string())
            }
            ExpenseError::NotOwner { .. }
            | ExpenseError::OwnerChange { .. }
            | ExpenseError::InitiatorNotParty(_) => {
                Self::Forbidden(err.to_string())
            }
            ExpenseError::PayerNotEligible(_) | ExpenseError::PartyNotEligible(_) => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
