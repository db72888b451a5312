//! Split allocation and validation.
//!
//! This module turns a raw expense into validated shares:
//! - Contribution and split types
//! - The split allocator (explicit amounts plus an equal remainder)
//! - The expense validator (eligibility, sanity, and sum tolerance)
//! - Error types for both stages

pub mod allocator;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod allocator_props;

pub use allocator::SplitAllocator;
pub use error::{AllocationError, SplitError, ValidationError};
pub use types::{AllocatedSplit, NegativeSharePolicy, ParticipantContribution, Share};
pub use validation::{Eligibility, ExpenseValidator};
