//! Money rounding for the single ledger currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` rounded to [`MONEY_SCALE`] places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept on every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Absolute tolerance allowed between the sum of splits and an expense total (0.01).
pub const SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, MONEY_SCALE);

/// Rounds an amount to [`MONEY_SCALE`] places, half-up.
///
/// Midpoints round away from zero, so `0.005` becomes `0.01` and `-0.005`
/// becomes `-0.01`.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if `actual` is within [`SPLIT_TOLERANCE`] of `expected`.
///
/// Values whose difference does not fit the decimal range are never within
/// tolerance.
#[must_use]
pub fn within_tolerance(actual: Decimal, expected: Decimal) -> bool {
    actual
        .checked_sub(expected)
        .is_some_and(|difference| difference.abs() <= SPLIT_TOLERANCE)
}
