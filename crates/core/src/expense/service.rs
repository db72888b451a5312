//! Expense service for building and guarding expense and settlement records.
//!
//! This module contains pure business logic with no persistence. Callers
//! fetch the eligible user set and existing records, and persist whatever
//! comes back.

use std::collections::HashSet;

use rust_decimal::Decimal;
use splitledger_shared::types::{ExpenseId, SettlementId, UserId, round_money};
use tracing::debug;

use super::error::ExpenseError;
use super::types::{Expense, ExpenseDraft, Settlement, SettlementDraft};
use crate::split::{Eligibility, NegativeSharePolicy, SplitAllocator};

/// Stateless service for the expense and settlement lifecycle.
pub struct ExpenseService;

impl ExpenseService {
    /// Create a new expense from a draft.
    ///
    /// # Arguments
    ///
    /// * `draft` - The expense as entered
    /// * `initiator` - The user creating the expense
    /// * `eligible_users` - Group members for a group expense, otherwise every known user
    /// * `policy` - How to treat negative implicit shares
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError` if the amount is not positive, the payer is not
    /// eligible, or allocation/validation of the splits fails.
    pub fn create_expense(
        draft: ExpenseDraft,
        initiator: UserId,
        eligible_users: &HashSet<UserId>,
        policy: NegativeSharePolicy,
    ) -> Result<Expense, ExpenseError> {
        Self::build_expense(ExpenseId::new(), draft, initiator, eligible_users, policy)
    }

    /// Replace an existing expense wholesale.
    ///
    /// The result keeps the existing id; splits are recomputed from the draft.
    /// The payer cannot change, since the payer owns the record.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotOwner` unless `actor` paid the existing
    /// expense, `ExpenseError::OwnerChange` if the draft names another payer,
    /// plus every error `create_expense` can return.
    pub fn replace_expense(
        existing: &Expense,
        draft: ExpenseDraft,
        actor: UserId,
        eligible_users: &HashSet<UserId>,
        policy: NegativeSharePolicy,
    ) -> Result<Expense, ExpenseError> {
        Self::ensure_owner(existing.payer_id, actor)?;
        Self::ensure_same_owner(existing.payer_id, draft.payer_id)?;
        Self::build_expense(existing.id, draft, actor, eligible_users, policy)
    }

    /// Check that `actor` may delete `existing`.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotOwner` unless `actor` is the payer.
    pub fn authorize_expense_delete(existing: &Expense, actor: UserId) -> Result<(), ExpenseError> {
        Self::ensure_owner(existing.payer_id, actor)
    }

    /// Record a new settlement payment.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError` if the amount is not positive, both parties are
    /// the same user, the initiator is not a party, or a party is not eligible.
    pub fn record_settlement(
        draft: SettlementDraft,
        initiator: UserId,
        eligible_users: &HashSet<UserId>,
    ) -> Result<Settlement, ExpenseError> {
        Self::build_settlement(SettlementId::new(), draft, initiator, eligible_users)
    }

    /// Replace an existing settlement. Only the paying user owns it, and the
    /// paying user cannot change.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotOwner` unless `actor` made the payment,
    /// `ExpenseError::OwnerChange` if the draft names another payer, plus
    /// every error `record_settlement` can return.
    pub fn replace_settlement(
        existing: &Settlement,
        draft: SettlementDraft,
        actor: UserId,
        eligible_users: &HashSet<UserId>,
    ) -> Result<Settlement, ExpenseError> {
        Self::ensure_owner(existing.from_id, actor)?;
        Self::ensure_same_owner(existing.from_id, draft.from_id)?;
        Self::build_settlement(existing.id, draft, actor, eligible_users)
    }

    /// Check that `actor` may delete `existing`.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotOwner` unless `actor` made the payment.
    pub fn authorize_settlement_delete(
        existing: &Settlement,
        actor: UserId,
    ) -> Result<(), ExpenseError> {
        Self::ensure_owner(existing.from_id, actor)
    }

    fn ensure_owner(owner: UserId, actor: UserId) -> Result<(), ExpenseError> {
        if owner == actor {
            Ok(())
        } else {
            Err(ExpenseError::NotOwner { actor, owner })
        }
    }

    fn ensure_same_owner(owner: UserId, requested: UserId) -> Result<(), ExpenseError> {
        if owner == requested {
            Ok(())
        } else {
            Err(ExpenseError::OwnerChange { owner, requested })
        }
    }

    fn build_expense(
        id: ExpenseId,
        draft: ExpenseDraft,
        initiator: UserId,
        eligible_users: &HashSet<UserId>,
        policy: NegativeSharePolicy,
    ) -> Result<Expense, ExpenseError> {
        if draft.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount(draft.amount));
        }
        let amount = round_money(draft.amount);

        let eligibility = match draft.group_id {
            Some(_) => Eligibility::group(eligible_users.iter().copied()),
            None => Eligibility::ungrouped(
                eligible_users.iter().copied(),
                initiator,
                draft.payer_id,
            ),
        };
        if !eligibility.permits(&draft.payer_id) {
            return Err(ExpenseError::PayerNotEligible(draft.payer_id));
        }

        let splits =
            SplitAllocator::allocate_and_validate(amount, &draft.contributions, &eligibility, policy)?;

        debug!(
            expense_id = %id,
            payer_id = %draft.payer_id,
            %amount,
            splits = splits.len(),
            "Expense validated"
        );

        Ok(Expense {
            id,
            description: draft.description,
            amount,
            payer_id: draft.payer_id,
            group_id: draft.group_id,
            splits,
            category: draft.category,
            date: draft.date,
        })
    }

    fn build_settlement(
        id: SettlementId,
        draft: SettlementDraft,
        initiator: UserId,
        eligible_users: &HashSet<UserId>,
    ) -> Result<Settlement, ExpenseError> {
        let amount = round_money(draft.amount);
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount(draft.amount));
        }
        if draft.from_id == draft.to_id {
            return Err(ExpenseError::SelfSettlement(draft.from_id));
        }
        if initiator != draft.from_id && initiator != draft.to_id {
            return Err(ExpenseError::InitiatorNotParty(initiator));
        }
        for party in [draft.from_id, draft.to_id] {
            if !eligible_users.contains(&party) {
                return Err(ExpenseError::PartyNotEligible(party));
            }
        }

        debug!(
            settlement_id = %id,
            from_id = %draft.from_id,
            to_id = %draft.to_id,
            %amount,
            "Settlement validated"
        );

        Ok(Settlement {
            id,
            from_id: draft.from_id,
            to_id: draft.to_id,
            amount,
            group_id: draft.group_id,
            date: draft.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::types::ExpenseCategory;
    use crate::split::{ParticipantContribution, SplitError, ValidationError};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use splitledger_shared::types::GroupId;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    fn group_draft(payer: UserId, participants: &[UserId], amount: Decimal) -> ExpenseDraft {
        ExpenseDraft {
            description: "Groceries".to_string(),
            amount,
            payer_id: payer,
            group_id: Some(GroupId::new()),
            contributions: participants
                .iter()
                .map(|id| ParticipantContribution::implicit(*id))
                .collect(),
            category: ExpenseCategory::Groceries,
            date: date(),
        }
    }

    fn settlement_draft(from: UserId, to: UserId, amount: Decimal) -> SettlementDraft {
        SettlementDraft {
            from_id: from,
            to_id: to,
            amount,
            group_id: None,
            date: date(),
        }
    }

    #[test]
    fn test_create_group_expense() {
        let (a, b) = (UserId::new(), UserId::new());
        let members = HashSet::from([a, b]);

        let expense = ExpenseService::create_expense(
            group_draft(a, &[a, b], dec!(40.00)),
            a,
            &members,
            NegativeSharePolicy::Reject,
        )
        .unwrap();

        assert_eq!(expense.amount, dec!(40.00));
        assert_eq!(expense.share_of(a), Some(dec!(20.00)));
        assert_eq!(expense.share_of(b), Some(dec!(20.00)));
        assert_eq!(expense.category, ExpenseCategory::Groceries);
    }

    #[test]
    fn test_create_rejects_non_positive_amount() {
        let a = UserId::new();
        let result = ExpenseService::create_expense(
            group_draft(a, &[a], Decimal::ZERO),
            a,
            &HashSet::from([a]),
            NegativeSharePolicy::Reject,
        );
        assert_eq!(result, Err(ExpenseError::NonPositiveAmount(Decimal::ZERO)));
    }

    #[test]
    fn test_create_rejects_payer_outside_group() {
        let (member, outsider) = (UserId::new(), UserId::new());
        let result = ExpenseService::create_expense(
            group_draft(outsider, &[member], dec!(10.00)),
            outsider,
            &HashSet::from([member]),
            NegativeSharePolicy::Reject,
        );
        assert_eq!(result, Err(ExpenseError::PayerNotEligible(outsider)));
    }

    #[test]
    fn test_create_surfaces_split_errors() {
        let (member, outsider) = (UserId::new(), UserId::new());
        let result = ExpenseService::create_expense(
            group_draft(member, &[member, outsider], dec!(10.00)),
            member,
            &HashSet::from([member]),
            NegativeSharePolicy::Reject,
        );
        assert_eq!(
            result,
            Err(ExpenseError::Split(SplitError::Validation(
                ValidationError::IneligibleParticipant(outsider)
            )))
        );
    }

    #[test]
    fn test_create_ungrouped_requires_initiator_involvement() {
        let (payer, friend, stranger) = (UserId::new(), UserId::new(), UserId::new());
        let users = HashSet::from([payer, friend, stranger]);
        let mut draft = group_draft(payer, &[payer, friend], dec!(30.00));
        draft.group_id = None;

        let result =
            ExpenseService::create_expense(draft.clone(), stranger, &users, NegativeSharePolicy::Reject);
        assert_eq!(
            result,
            Err(ExpenseError::Split(SplitError::Validation(
                ValidationError::InitiatorNotInvolved(stranger)
            )))
        );

        let expense =
            ExpenseService::create_expense(draft, friend, &users, NegativeSharePolicy::Reject)
                .unwrap();
        assert_eq!(expense.group_id, None);
        assert_eq!(expense.share_of(friend), Some(dec!(15.00)));
    }

    #[test]
    fn test_replace_keeps_id_and_replaces_splits() {
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        let members = HashSet::from([a, b, c]);
        let original = ExpenseService::create_expense(
            group_draft(a, &[a, b], dec!(40.00)),
            a,
            &members,
            NegativeSharePolicy::Reject,
        )
        .unwrap();

        let replaced = ExpenseService::replace_expense(
            &original,
            group_draft(a, &[a, b, c], dec!(60.00)),
            a,
            &members,
            NegativeSharePolicy::Reject,
        )
        .unwrap();

        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.splits.len(), 3);
        assert_eq!(replaced.share_of(c), Some(dec!(20.00)));
    }

    #[test]
    fn test_only_payer_may_replace_or_delete_expense() {
        let (a, b) = (UserId::new(), UserId::new());
        let members = HashSet::from([a, b]);
        let expense = ExpenseService::create_expense(
            group_draft(a, &[a, b], dec!(40.00)),
            a,
            &members,
            NegativeSharePolicy::Reject,
        )
        .unwrap();

        let result = ExpenseService::replace_expense(
            &expense,
            group_draft(a, &[a, b], dec!(10.00)),
            b,
            &members,
            NegativeSharePolicy::Reject,
        );
        assert_eq!(result, Err(ExpenseError::NotOwner { actor: b, owner: a }));

        assert!(ExpenseService::authorize_expense_delete(&expense, a).is_ok());
        assert_eq!(
            ExpenseService::authorize_expense_delete(&expense, b),
            Err(ExpenseError::NotOwner { actor: b, owner: a })
        );
    }

    #[test]
    fn test_replace_cannot_hand_expense_to_another_payer() {
        let (a, b) = (UserId::new(), UserId::new());
        let members = HashSet::from([a, b]);
        let expense = ExpenseService::create_expense(
            group_draft(a, &[a, b], dec!(40.00)),
            a,
            &members,
            NegativeSharePolicy::Reject,
        )
        .unwrap();

        let result = ExpenseService::replace_expense(
            &expense,
            group_draft(b, &[a, b], dec!(40.00)),
            a,
            &members,
            NegativeSharePolicy::Reject,
        );

        assert_eq!(
            result,
            Err(ExpenseError::OwnerChange {
                owner: a,
                requested: b,
            })
        );
    }

    #[test]
    fn test_record_settlement() {
        let (a, b) = (UserId::new(), UserId::new());
        let users = HashSet::from([a, b]);

        let settlement =
            ExpenseService::record_settlement(settlement_draft(b, a, dec!(20.004)), b, &users)
                .unwrap();

        assert_eq!(settlement.amount, dec!(20.00));
        assert_eq!(settlement.from_id, b);
        assert_eq!(settlement.to_id, a);
    }

    #[test]
    fn test_record_settlement_rejections() {
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        let users = HashSet::from([a, b]);

        assert_eq!(
            ExpenseService::record_settlement(settlement_draft(a, b, dec!(-1)), a, &users),
            Err(ExpenseError::NonPositiveAmount(dec!(-1)))
        );
        assert_eq!(
            ExpenseService::record_settlement(settlement_draft(a, a, dec!(5)), a, &users),
            Err(ExpenseError::SelfSettlement(a))
        );
        assert_eq!(
            ExpenseService::record_settlement(settlement_draft(a, b, dec!(5)), c, &users),
            Err(ExpenseError::InitiatorNotParty(c))
        );
        assert_eq!(
            ExpenseService::record_settlement(settlement_draft(a, c, dec!(5)), a, &users),
            Err(ExpenseError::PartyNotEligible(c))
        );
    }

    #[test]
    fn test_only_payer_may_change_settlement() {
        let (a, b) = (UserId::new(), UserId::new());
        let users = HashSet::from([a, b]);
        let settlement =
            ExpenseService::record_settlement(settlement_draft(a, b, dec!(5)), b, &users).unwrap();

        let replaced = ExpenseService::replace_settlement(
            &settlement,
            settlement_draft(a, b, dec!(7.50)),
            a,
            &users,
        )
        .unwrap();
        assert_eq!(replaced.id, settlement.id);
        assert_eq!(replaced.amount, dec!(7.50));

        assert_eq!(
            ExpenseService::replace_settlement(
                &settlement,
                settlement_draft(b, a, dec!(7.50)),
                a,
                &users,
            ),
            Err(ExpenseError::OwnerChange {
                owner: a,
                requested: b,
            })
        );

        assert_eq!(
            ExpenseService::authorize_settlement_delete(&settlement, b),
            Err(ExpenseError::NotOwner { actor: b, owner: a })
        );
        assert!(ExpenseService::authorize_settlement_delete(&settlement, a).is_ok());
    }
}
