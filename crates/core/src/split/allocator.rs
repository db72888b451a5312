//! Split allocation: turning contributions into per-participant shares.
//!
//! Explicit amounts are kept as entered (rounded to cents). Whatever is left
//! of the total is divided equally among the implicit participants, each
//! share rounded half-up on its own. Because every implicit share is rounded
//! independently, the result can differ from the total by up to half a cent
//! per implicit participant; validation absorbs that with a fixed tolerance.

use rust_decimal::Decimal;
use splitledger_shared::types::round_money;
use tracing::debug;

use super::error::{AllocationError, SplitError};
use super::types::{AllocatedSplit, NegativeSharePolicy, ParticipantContribution};
use super::validation::{Eligibility, ExpenseValidator};

/// Allocates expense totals across participants.
pub struct SplitAllocator;

impl SplitAllocator {
    /// Allocate `total` across `contributions`.
    ///
    /// Returns one split per contribution, in input order. Implicit
    /// participants all receive `round(remainder / count, 2)`, which is
    /// negative when the explicit amounts already exceed the total; that
    /// case is left for validation to judge.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use splitledger_core::split::{ParticipantContribution, SplitAllocator};
    /// use splitledger_shared::types::UserId;
    ///
    /// let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
    /// let splits = SplitAllocator::allocate(
    ///     dec!(100.00),
    ///     &[
    ///         ParticipantContribution::explicit(a, dec!(30.00)),
    ///         ParticipantContribution::implicit(b),
    ///         ParticipantContribution::implicit(c),
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(splits[1].amount, dec!(35.00));
    /// assert_eq!(splits[2].amount, dec!(35.00));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NoParticipants` for an empty list,
    /// `AllocationError::NonPositiveTotal` if `total <= 0`, and
    /// `AllocationError::AmountOverflow` if the explicit amounts cannot be
    /// summed within the decimal range.
    pub fn allocate(
        total: Decimal,
        contributions: &[ParticipantContribution],
    ) -> Result<Vec<AllocatedSplit>, AllocationError> {
        if contributions.is_empty() {
            return Err(AllocationError::NoParticipants);
        }
        if total <= Decimal::ZERO {
            return Err(AllocationError::NonPositiveTotal(total));
        }

        let explicit_sum = contributions
            .iter()
            .filter_map(ParticipantContribution::explicit_amount)
            .map(round_money)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .ok_or(AllocationError::AmountOverflow)?;
        let implicit_count = contributions
            .iter()
            .filter(|c| c.explicit_amount().is_none())
            .count();

        if implicit_count == 0 {
            return Ok(contributions
                .iter()
                .map(|c| {
                    AllocatedSplit::new(
                        c.participant_id,
                        round_money(c.explicit_amount().unwrap_or_default()),
                    )
                })
                .collect());
        }

        let remainder = total
            .checked_sub(explicit_sum)
            .ok_or(AllocationError::AmountOverflow)?;
        let share = round_money(remainder / Decimal::from(implicit_count));

        debug!(
            %total,
            %explicit_sum,
            %remainder,
            implicit_count,
            %share,
            "Allocated remainder across implicit participants"
        );

        Ok(contributions
            .iter()
            .map(|c| {
                let amount = c.explicit_amount().map_or(share, round_money);
                AllocatedSplit::new(c.participant_id, amount)
            })
            .collect())
    }

    /// Allocate and then validate the resulting splits.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidInput` if allocation fails and
    /// `SplitError::Validation` for the first failed validation check.
    pub fn allocate_and_validate(
        total: Decimal,
        contributions: &[ParticipantContribution],
        eligibility: &Eligibility,
        policy: NegativeSharePolicy,
    ) -> Result<Vec<AllocatedSplit>, SplitError> {
        let splits = Self::allocate(total, contributions)?;
        ExpenseValidator::validate(total, &splits, eligibility, policy)?;
        Ok(splits)
    }
}
