//! Integrity checks shared by both aggregation paths.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::warn;

use super::error::{RecordError, RecordRef};
use crate::expense::{Expense, Settlement};

/// Checks an expense record is usable for aggregation.
pub(crate) fn check_expense(expense: &Expense) -> Result<(), RecordError> {
    let record = RecordRef::Expense(expense.id);

    if expense.amount <= Decimal::ZERO {
        return Err(RecordError::NonPositiveAmount {
            record,
            amount: expense.amount,
        });
    }
    if expense.splits.is_empty() {
        return Err(RecordError::EmptySplits { record });
    }

    let mut seen = HashSet::with_capacity(expense.splits.len());
    for split in &expense.splits {
        if !seen.insert(split.participant_id) {
            return Err(RecordError::DuplicateParticipant {
                record,
                participant_id: split.participant_id,
            });
        }
    }

    Ok(())
}

/// Checks a settlement record is usable for aggregation.
pub(crate) fn check_settlement(settlement: &Settlement) -> Result<(), RecordError> {
    let record = RecordRef::Settlement(settlement.id);

    if settlement.amount <= Decimal::ZERO {
        return Err(RecordError::NonPositiveAmount {
            record,
            amount: settlement.amount,
        });
    }
    if settlement.from_id == settlement.to_id {
        return Err(RecordError::SelfSettlement {
            record,
            user_id: settlement.from_id,
        });
    }

    Ok(())
}

/// Logs a skipped record and keeps it for the caller.
pub(crate) fn reject(rejected: &mut Vec<RecordError>, err: RecordError) {
    warn!(
        record = %err.record(),
        code = err.error_code(),
        error = %err,
        "Skipping malformed record"
    );
    rejected.push(err);
}
