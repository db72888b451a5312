//! Split domain types for allocating an expense across participants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::LedgerConfig;
use splitledger_shared::types::UserId;

use super::error::AllocationError;

/// How much of an expense a participant asked to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum Share {
    /// A fixed amount entered by the user.
    Explicit(Decimal),
    /// Left unspecified; receives an equal part of the remainder.
    Implicit,
}

impl Share {
    /// Maps a raw optional amount to a share.
    ///
    /// Absent, zero, and negative amounts all mean "unspecified".
    #[must_use]
    pub fn from_amount(amount: Option<Decimal>) -> Self {
        match amount {
            Some(amount) if amount > Decimal::ZERO => Self::Explicit(amount),
            _ => Self::Implicit,
        }
    }
}

/// A participant's contribution as entered, before allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantContribution {
    /// The participant this contribution belongs to.
    pub participant_id: UserId,
    /// The requested share.
    pub share: Share,
}

impl ParticipantContribution {
    /// Creates a contribution with a fixed amount.
    #[must_use]
    pub fn explicit(participant_id: UserId, amount: Decimal) -> Self {
        Self {
            participant_id,
            share: Share::from_amount(Some(amount)),
        }
    }

    /// Creates a contribution that takes an equal part of the remainder.
    #[must_use]
    pub const fn implicit(participant_id: UserId) -> Self {
        Self {
            participant_id,
            share: Share::Implicit,
        }
    }

    /// Creates a contribution from an optional amount.
    #[must_use]
    pub fn from_amount(participant_id: UserId, amount: Option<Decimal>) -> Self {
        Self {
            participant_id,
            share: Share::from_amount(amount),
        }
    }

    /// Parses a contribution from raw form input.
    ///
    /// A missing or blank string is implicit, as is any amount `<= 0`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::MalformedAmount` if the text is not a decimal.
    pub fn parse(participant_id: UserId, raw: Option<&str>) -> Result<Self, AllocationError> {
        let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(Self::implicit(participant_id));
        };

        let amount = text
            .parse::<Decimal>()
            .map_err(|_| AllocationError::MalformedAmount {
                participant_id,
                raw: text.to_string(),
            })?;

        Ok(Self::from_amount(participant_id, Some(amount)))
    }

    /// Returns the explicit amount, if this contribution counts as explicit.
    #[must_use]
    pub fn explicit_amount(&self) -> Option<Decimal> {
        match self.share {
            Share::Explicit(amount) if amount > Decimal::ZERO => Some(amount),
            _ => None,
        }
    }
}

/// A fully specified share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedSplit {
    /// The participant owing this share.
    pub participant_id: UserId,
    /// The share, rounded to two decimal places.
    pub amount: Decimal,
}

impl AllocatedSplit {
    /// Creates a new allocated split.
    #[must_use]
    pub const fn new(participant_id: UserId, amount: Decimal) -> Self {
        Self {
            participant_id,
            amount,
        }
    }
}

/// What to do with a negative implicit share (explicit amounts exceeding the total).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeSharePolicy {
    /// Reject the expense with `ValidationError::NegativeShare`.
    #[default]
    Reject,
    /// Accept negative shares as partial refunds.
    AllowRefunds,
}

impl NegativeSharePolicy {
    /// Returns true if negative shares pass validation.
    #[must_use]
    pub const fn allows_negative(self) -> bool {
        matches!(self, Self::AllowRefunds)
    }
}

impl From<&LedgerConfig> for NegativeSharePolicy {
    fn from(config: &LedgerConfig) -> Self {
        if config.allow_negative_shares {
            Self::AllowRefunds
        } else {
            Self::Reject
        }
    }
}
