//! Property-based tests for split allocation and validation.
//!
//! - Allocation completeness
//! - Allocation sum law
//! - Equal-split exactness
//! - Validator tolerance boundary

use proptest::prelude::*;
use rust_decimal::Decimal;
use splitledger_shared::types::{UserId, round_money};

use super::allocator::SplitAllocator;
use super::error::ValidationError;
use super::types::{AllocatedSplit, NegativeSharePolicy, ParticipantContribution};
use super::validation::{Eligibility, ExpenseValidator};

/// Half a cent, the worst-case rounding error of one implicit share.
const HALF_CENT: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Strategy to generate a positive total (0.01 to 100,000.00).
fn positive_total() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a contribution shape: `Some(cents)` is explicit, `None` implicit.
fn contribution_shapes() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::of(1i64..5_000_000i64), 1..12)
}

fn build(shapes: &[Option<i64>]) -> Vec<ParticipantContribution> {
    shapes
        .iter()
        .map(|shape| {
            ParticipantContribution::from_amount(UserId::new(), shape.map(|c| Decimal::new(c, 2)))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every contribution yields exactly one split, in input order.
    #[test]
    fn prop_allocation_is_complete(
        total in positive_total(),
        shapes in contribution_shapes(),
    ) {
        let contributions = build(&shapes);
        let splits = SplitAllocator::allocate(total, &contributions).unwrap();

        prop_assert_eq!(splits.len(), contributions.len());
        for (split, contribution) in splits.iter().zip(&contributions) {
            prop_assert_eq!(split.participant_id, contribution.participant_id);
        }
    }

    /// With at least one implicit participant, the splits land within
    /// `count(implicit) * 0.005 + 0.01` of the total.
    #[test]
    fn prop_allocation_sum_law(
        total in positive_total(),
        mut shapes in contribution_shapes(),
    ) {
        shapes.push(None);
        let contributions = build(&shapes);
        let implicit = shapes.iter().filter(|s| s.is_none()).count();

        let splits = SplitAllocator::allocate(total, &contributions).unwrap();
        let sum: Decimal = splits.iter().map(|s| s.amount).sum();

        let bound = HALF_CENT * Decimal::from(implicit) + Decimal::new(1, 2);
        prop_assert!(
            (sum - total).abs() <= bound,
            "sum {} too far from total {} (bound {})", sum, total, bound
        );
    }

    /// All-implicit splits are each `round(total / n, 2)`.
    #[test]
    fn prop_equal_split_exactness(
        total in positive_total(),
        n in 1usize..25,
    ) {
        let contributions: Vec<_> = (0..n)
            .map(|_| ParticipantContribution::implicit(UserId::new()))
            .collect();

        let splits = SplitAllocator::allocate(total, &contributions).unwrap();
        let expected = round_money(total / Decimal::from(n));

        for split in &splits {
            prop_assert_eq!(split.amount, expected);
        }
        let sum: Decimal = splits.iter().map(|s| s.amount).sum();
        prop_assert!((sum - total).abs() <= HALF_CENT * Decimal::from(n));
    }

    /// A single split off by one cent passes; off by two cents fails.
    #[test]
    fn prop_validator_tolerance_boundary(
        total in positive_total(),
        upward in any::<bool>(),
    ) {
        let participant = UserId::new();
        let eligibility = Eligibility::group([participant]);
        let cent = Decimal::new(1, 2);
        let sign = if upward { Decimal::ONE } else { Decimal::NEGATIVE_ONE };

        let within = vec![AllocatedSplit::new(participant, total + sign * cent)];
        prop_assert!(
            ExpenseValidator::validate(total, &within, &eligibility, NegativeSharePolicy::AllowRefunds)
                .is_ok()
        );

        let beyond = vec![AllocatedSplit::new(
            participant,
            total + sign * cent * Decimal::TWO,
        )];
        let is_sum_mismatch = matches!(
            ExpenseValidator::validate(total, &beyond, &eligibility, NegativeSharePolicy::AllowRefunds),
            Err(ValidationError::SumMismatch { .. })
        );
        prop_assert!(is_sum_mismatch);
    }
}
