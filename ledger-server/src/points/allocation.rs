//! Deduction allocation
//!
//! Pure functions for splitting a deduction across a member's batches.
//! Consumption order is soonest-to-expire first, ties broken by batch id,
//! so the same snapshot always yields the same plan.

use shared::models::{AllocationEntry, AllocationPlan, PointBatch};

use super::PointsError;
use super::validation::validate_amount;

/// Batches eligible for consumption at `now`, in consumption order.
///
/// Expired and exhausted batches are dropped.
pub fn consumption_order(batches: &[PointBatch], now: i64) -> Vec<&PointBatch> {
    let mut eligible: Vec<&PointBatch> = batches
        .iter()
        .filter(|b| b.is_usable_at(now) && b.remaining() > 0)
        .collect();
    eligible.sort_by_key(|b| (b.ended_at, b.id));
    eligible
}

/// Plan a deduction of `amount` points against `batches` at `now`.
///
/// Either the whole amount is covered or nothing is: a short balance is
/// reported as [`PointsError::InsufficientBalance`], never a partial plan.
pub fn allocate(
    batches: &[PointBatch],
    now: i64,
    amount: i64,
) -> Result<AllocationPlan, PointsError> {
    validate_amount(amount)?;

    let mut demand = amount;
    let mut entries = Vec::new();

    for batch in consumption_order(batches, now) {
        if demand == 0 {
            break;
        }
        let take = batch.remaining().min(demand);
        entries.push(AllocationEntry {
            batch_id: batch.id,
            points_consumed: take,
        });
        demand -= take;
    }

    if demand > 0 {
        return Err(PointsError::InsufficientBalance {
            requested: amount,
            available: amount - demand,
        });
    }

    Ok(AllocationPlan { entries })
}
