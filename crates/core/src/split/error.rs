//! Split allocation and validation errors.
//!
//! Allocation errors describe malformed input to the allocator. Validation
//! errors carry enough detail (offending participant, expected and actual
//! sums) for the caller to show an actionable message.

use rust_decimal::Decimal;
use splitledger_shared::AppError;
use splitledger_shared::types::UserId;
use thiserror::Error;

/// Malformed allocator input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The contribution list is empty.
    #[error("An expense needs at least one participant")]
    NoParticipants,

    /// The expense total is zero or negative.
    #[error("Expense total must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// The amounts are too large to add up within the decimal range.
    #[error("Contribution amounts are too large to allocate")]
    AmountOverflow,

    /// A contribution amount could not be parsed.
    #[error("Amount {raw:?} for participant {participant_id} is not a valid decimal")]
    MalformedAmount {
        /// The participant whose amount was malformed.
        participant_id: UserId,
        /// The raw text as entered.
        raw: String,
    },
}

/// A split list that fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No splits were supplied.
    #[error("An expense must have at least one split")]
    NoSplits,

    /// The same participant appears more than once.
    #[error("Participant {0} appears in more than one split")]
    DuplicateParticipant(UserId),

    /// A participant is not allowed on this expense.
    #[error("Participant {0} is not eligible for this expense")]
    IneligibleParticipant(UserId),

    /// The caller creating a non-group expense is neither payer nor participant.
    #[error("User {0} must be the payer or one of the participants")]
    InitiatorNotInvolved(UserId),

    /// A share is negative while negative shares are rejected.
    #[error("Participant {participant_id} would receive a negative share of {amount}")]
    NegativeShare {
        /// The participant with the negative share.
        participant_id: UserId,
        /// The negative amount.
        amount: Decimal,
    },

    /// The splits cannot be summed within the decimal range.
    #[error("Split amounts are too large to add up")]
    SumOverflow,

    /// The splits do not add up to the expense total.
    #[error(
        "Splits add up to {computed} but the expense total is {expected} (difference {difference})"
    )]
    SumMismatch {
        /// Sum of all split amounts.
        computed: Decimal,
        /// The expense total.
        expected: Decimal,
        /// `computed - expected`.
        difference: Decimal,
    },
}

/// Any failure while turning contributions into validated splits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Malformed allocator input.
    #[error(transparent)]
    InvalidInput(#[from] AllocationError),

    /// Allocated splits failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AllocationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::NonPositiveTotal(_) => "NON_POSITIVE_TOTAL",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::MalformedAmount { .. } => "MALFORMED_AMOUNT",
        }
    }
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoSplits => "NO_SPLITS",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::IneligibleParticipant(_) => "INELIGIBLE_PARTICIPANT",
            Self::InitiatorNotInvolved(_) => "INITIATOR_NOT_INVOLVED",
            Self::NegativeShare { .. } => "NEGATIVE_SHARE",
            Self::SumOverflow => "SUM_OVERFLOW",
            Self::SumMismatch { .. } => "SUM_MISMATCH",
        }
    }
}

impl SplitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(err) => err.error_code(),
            Self::Validation(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the request itself is malformed
            Self::InvalidInput(_) => 400,
            // 422 Unprocessable - well-formed but the splits don't hold up
            Self::Validation(_) => 422,
        }
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::InvalidInput(err) => Self::Validation(err.to_string()),
            SplitError::Validation(err) => Self::BusinessRule(err.to_string()),
        }
    }
}
