//! Business rule validation for allocated splits.

use std::collections::HashSet;

use rust_decimal::Decimal;
use splitledger_shared::types::{UserId, within_tolerance};

use super::error::ValidationError;
use super::types::{AllocatedSplit, NegativeSharePolicy};

/// Who may appear on an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Group expense: only members of the group.
    GroupMembers(HashSet<UserId>),
    /// Non-group expense: any known user, as long as the initiating caller
    /// is the payer or one of the participants.
    KnownUsers {
        /// Every existing user.
        users: HashSet<UserId>,
        /// The caller creating or replacing the expense.
        initiator: UserId,
        /// The expense payer.
        payer: UserId,
    },
}

impl Eligibility {
    /// Eligibility for a group expense.
    #[must_use]
    pub fn group(members: impl IntoIterator<Item = UserId>) -> Self {
        Self::GroupMembers(members.into_iter().collect())
    }

    /// Eligibility for a non-group expense.
    #[must_use]
    pub fn ungrouped(
        users: impl IntoIterator<Item = UserId>,
        initiator: UserId,
        payer: UserId,
    ) -> Self {
        Self::KnownUsers {
            users: users.into_iter().collect(),
            initiator,
            payer,
        }
    }

    /// Returns true if `participant` may hold a share.
    #[must_use]
    pub fn permits(&self, participant: &UserId) -> bool {
        match self {
            Self::GroupMembers(members) => members.contains(participant),
            Self::KnownUsers { users, .. } => users.contains(participant),
        }
    }
}

/// Validates allocated splits against an expense total.
pub struct ExpenseValidator;

impl ExpenseValidator {
    /// Validates splits, stopping at the first violation.
    ///
    /// Checks run in this order:
    /// 1. at least one split
    /// 2. no participant appears twice
    /// 3. every participant is eligible (and, for non-group expenses, the
    ///    initiator is involved)
    /// 4. no negative share unless the policy allows refunds
    /// 5. `|sum - total| <= 0.01`, with a sum that fits the decimal range
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(
        total: Decimal,
        splits: &[AllocatedSplit],
        eligibility: &Eligibility,
        policy: NegativeSharePolicy,
    ) -> Result<(), ValidationError> {
        match Self::check(total, splits, eligibility, policy, true)
            .into_iter()
            .next()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Runs every check and returns all violations, in check order.
    #[must_use]
    pub fn collect_violations(
        total: Decimal,
        splits: &[AllocatedSplit],
        eligibility: &Eligibility,
        policy: NegativeSharePolicy,
    ) -> Vec<ValidationError> {
        Self::check(total, splits, eligibility, policy, false)
    }

    fn check(
        total: Decimal,
        splits: &[AllocatedSplit],
        eligibility: &Eligibility,
        policy: NegativeSharePolicy,
        fail_fast: bool,
    ) -> Vec<ValidationError> {
        if splits.is_empty() {
            return vec![ValidationError::NoSplits];
        }

        let mut violations = Vec::new();

        let mut seen = HashSet::with_capacity(splits.len());
        for split in splits {
            if !seen.insert(split.participant_id) {
                violations.push(ValidationError::DuplicateParticipant(split.participant_id));
                if fail_fast {
                    return violations;
                }
            }
        }

        for split in splits {
            if !eligibility.permits(&split.participant_id) {
                violations.push(ValidationError::IneligibleParticipant(split.participant_id));
                if fail_fast {
                    return violations;
                }
            }
        }

        if let Eligibility::KnownUsers {
            initiator, payer, ..
        } = eligibility
            && initiator != payer
            && !seen.contains(initiator)
        {
            violations.push(ValidationError::InitiatorNotInvolved(*initiator));
            if fail_fast {
                return violations;
            }
        }

        if !policy.allows_negative() {
            for split in splits.iter().filter(|s| s.amount < Decimal::ZERO) {
                violations.push(ValidationError::NegativeShare {
                    participant_id: split.participant_id,
                    amount: split.amount,
                });
                if fail_fast {
                    return violations;
                }
            }
        }

        let computed = splits
            .iter()
            .map(|s| s.amount)
            .try_fold(Decimal::ZERO, Decimal::checked_add);
        match computed {
            None => violations.push(ValidationError::SumOverflow),
            Some(computed) if !within_tolerance(computed, total) => {
                violations.push(ValidationError::SumMismatch {
                    computed,
                    expected: total,
                    difference: computed.saturating_sub(total),
                });
            }
            Some(_) => {}
        }

        violations
    }
}
