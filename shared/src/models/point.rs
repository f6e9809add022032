//! Point Batch Models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::order::{AllocationPlan, Order};

/// Point batch entity (点数批次)
///
/// One grant of points to a member with its own expiration and
/// consumption counter. Batches are never deleted; exhausted and expired
/// batches stay for history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PointBatch {
    pub id: i64,
    pub member_id: String,
    pub title: String,
    /// Total granted points
    pub points: i64,
    /// Points already consumed by orders (0 <= used_points <= points)
    pub used_points: i64,
    /// Inclusive expiration instant (Unix millis)
    pub ended_at: i64,
    pub created_at: i64,
}

impl PointBatch {
    /// Unconsumed points, never negative
    pub fn remaining(&self) -> i64 {
        self.points.saturating_sub(self.used_points).max(0)
    }

    /// A batch is usable through its `ended_at` instant
    pub fn is_usable_at(&self, now: i64) -> bool {
        self.ended_at >= now
    }
}

/// Batch creation payload handed to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    pub member_id: String,
    pub title: String,
    pub points: i64,
    pub ended_at: i64,
}

/// Batch with derived fields (for list/detail views)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchView {
    #[serde(flatten)]
    pub batch: PointBatch,
    pub remaining: i64,
    pub expired: bool,
}

impl BatchView {
    pub fn at(batch: PointBatch, now: i64) -> Self {
        Self {
            remaining: batch.remaining(),
            expired: !batch.is_usable_at(now),
            batch,
        }
    }
}

/// Member points overview: balance, batches and order history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsSummary {
    pub member_id: String,
    pub balance: i64,
    pub batches: Vec<BatchView>,
    pub orders: Vec<Order>,
}

/// Adjust points payload
///
/// `points > 0` grants a new batch, `points < 0` deducts `|points|`.
/// `ended_on` only applies to grants; the batch then expires at the end of
/// that day in the business time zone (default: end of today).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustPoints {
    pub title: String,
    pub points: i64,
    #[serde(default)]
    pub ended_on: Option<NaiveDate>,
}

/// Result of an adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdjustOutcome {
    Granted { batch: PointBatch, balance: i64 },
    Deducted { order: Order, balance: i64 },
}

/// Preview deduction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewDeduction {
    pub points: i64,
}

/// Side-effect-free deduction preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionPreview {
    pub balance_before: i64,
    pub balance_after: i64,
    pub plan: AllocationPlan,
}
