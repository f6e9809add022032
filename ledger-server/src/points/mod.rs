//! Point ledger core
//!
//! Pure, synchronous functions over an in-memory snapshot of a member's
//! point batches. No I/O, no clock: every function takes `now` explicitly.
//!
//! - [`balance`] - usable balance
//! - [`allocation`] - soonest-expiry-first deduction planning
//! - [`grant`] - batch creation requests
//! - [`validation`] - amount / snapshot checks shared by the above

pub mod allocation;
pub mod balance;
pub mod grant;
pub mod validation;

pub use allocation::allocate;
pub use balance::usable_balance;
pub use grant::grant;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Points core errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointsError {
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    #[error("Points amount must be between 1 and {max}, got {0}", max = validation::MAX_POINTS_AMOUNT)]
    InvalidAmount(i64),

    #[error("Point batch {batch_id} is inconsistent: {reason}")]
    CorruptBatch { batch_id: i64, reason: String },
}

impl From<PointsError> for AppError {
    fn from(err: PointsError) -> Self {
        match err {
            PointsError::InsufficientBalance {
                requested,
                available,
            } => AppError::insufficient_points(requested, available),
            PointsError::InvalidAmount(amount) => AppError::invalid_amount(amount),
            PointsError::CorruptBatch { batch_id, reason } => {
                AppError::with_message(ErrorCode::PointBatchCorrupted, reason)
                    .with_detail("batch_id", batch_id)
            }
        }
    }
}
