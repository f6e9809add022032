//! Ledger service
//!
//! Orchestrates the pure points core against a [`LedgerGateway`]:
//! fetch snapshot → compute → commit. The caller always re-fetches after a
//! commit; nothing here caches balances.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AdjustOutcome, AdjustPoints, AllocationCommit, BatchView, DeductionPreview, Order,
    OrderDetail, PointBatch, PointsSummary,
};
use thiserror::Error;

use crate::gateway::{GatewayError, LedgerGateway};
use crate::points::validation::{validate_amount, validate_snapshot};
use crate::points::{self, PointsError, usable_balance};
use crate::utils::time::end_of_date_millis;

/// Ledger service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Points(#[from] PointsError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Commit conflicted again after one fresh re-plan
    #[error("Allocation kept conflicting on point batch {batch_id}")]
    Conflict { batch_id: i64 },

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Expiry date {0} is already over")]
    ExpiredGrant(NaiveDate),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Points(e) => e.into(),
            LedgerError::Gateway(e) => e.into(),
            LedgerError::Conflict { batch_id } => AppError::allocation_conflict(batch_id),
            LedgerError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
                    .with_detail("order_id", id)
            }
            LedgerError::ExpiredGrant(date) => {
                AppError::validation(format!("ended_on {date} is already over"))
                    .with_detail("ended_on", date.to_string())
            }
        }
    }
}

#[derive(Clone)]
pub struct LedgerService {
    gateway: Arc<dyn LedgerGateway>,
    tz: Tz,
}

impl LedgerService {
    pub fn new(gateway: Arc<dyn LedgerGateway>, tz: Tz) -> Self {
        Self { gateway, tz }
    }

    /// Balance, batch list (soonest expiry first) and order history (newest first)
    pub async fn summary(&self, member_id: &str, now: i64) -> LedgerResult<PointsSummary> {
        let batches = self.snapshot(member_id).await?;
        let orders = self.gateway.fetch_orders(member_id).await?;
        Ok(PointsSummary {
            member_id: member_id.to_string(),
            balance: usable_balance(&batches, now),
            batches: batch_views(batches, now),
            orders,
        })
    }

    pub async fn batches(&self, member_id: &str, now: i64) -> LedgerResult<Vec<BatchView>> {
        let batches = self.snapshot(member_id).await?;
        Ok(batch_views(batches, now))
    }

    pub async fn orders(&self, member_id: &str) -> LedgerResult<Vec<Order>> {
        Ok(self.gateway.fetch_orders(member_id).await?)
    }

    pub async fn order_detail(&self, member_id: &str, order_id: i64) -> LedgerResult<OrderDetail> {
        self.gateway
            .fetch_order(member_id, order_id)
            .await?
            .ok_or(LedgerError::OrderNotFound(order_id))
    }

    pub async fn balance(&self, member_id: &str, now: i64) -> LedgerResult<i64> {
        let batches = self.gateway.fetch_batches(member_id).await?;
        Ok(usable_balance(&batches, now))
    }

    /// Signed adjustment: positive grants, negative deducts, zero is rejected
    pub async fn adjust(
        &self,
        member_id: &str,
        input: AdjustPoints,
        now: i64,
    ) -> LedgerResult<AdjustOutcome> {
        if input.points > 0 {
            let ended_at = match input.ended_on {
                Some(date) => {
                    let ended_at = end_of_date_millis(date, self.tz);
                    if ended_at < now {
                        return Err(LedgerError::ExpiredGrant(date));
                    }
                    Some(ended_at)
                }
                None => None,
            };
            let batch = self
                .grant(member_id, &input.title, input.points, ended_at, now)
                .await?;
            let balance = self.balance(member_id, now).await?;
            Ok(AdjustOutcome::Granted { batch, balance })
        } else if input.points < 0 {
            let amount = input
                .points
                .checked_neg()
                .ok_or(PointsError::InvalidAmount(input.points))?;
            let order = self.deduct(member_id, &input.title, amount, now).await?;
            let balance = self.balance(member_id, now).await?;
            Ok(AdjustOutcome::Deducted { order, balance })
        } else {
            Err(PointsError::InvalidAmount(0).into())
        }
    }

    /// Create one batch; `ended_at` defaults to the end of today
    pub async fn grant(
        &self,
        member_id: &str,
        title: &str,
        points: i64,
        ended_at: Option<i64>,
        now: i64,
    ) -> LedgerResult<PointBatch> {
        let request = points::grant(member_id, title, points, ended_at, now, self.tz)?;
        Ok(self.gateway.commit_grant(&request).await?)
    }

    /// Deduct `amount` points, soonest-expiring batches first.
    ///
    /// A stale snapshot is re-fetched and re-planned exactly once.
    pub async fn deduct(
        &self,
        member_id: &str,
        title: &str,
        amount: i64,
        now: i64,
    ) -> LedgerResult<Order> {
        validate_amount(amount)?;

        match self.plan_and_commit(member_id, title, amount, now).await {
            Err(LedgerError::Gateway(GatewayError::Conflict { batch_id })) => {
                tracing::warn!(
                    member_id = %member_id,
                    batch_id,
                    amount,
                    "Allocation conflict, re-planning against a fresh snapshot"
                );
                match self.plan_and_commit(member_id, title, amount, now).await {
                    Err(LedgerError::Gateway(GatewayError::Conflict { batch_id })) => {
                        tracing::warn!(member_id = %member_id, batch_id, "Allocation conflict persisted");
                        Err(LedgerError::Conflict { batch_id })
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    /// Plan without committing (confirmation step)
    pub async fn preview(
        &self,
        member_id: &str,
        amount: i64,
        now: i64,
    ) -> LedgerResult<DeductionPreview> {
        validate_amount(amount)?;
        let batches = self.checked_snapshot(member_id).await?;
        let plan = points::allocate(&batches, now, amount)?;
        let balance_before = usable_balance(&batches, now);
        Ok(DeductionPreview {
            balance_before,
            balance_after: balance_before.saturating_sub(plan.total()),
            plan,
        })
    }

    async fn plan_and_commit(
        &self,
        member_id: &str,
        title: &str,
        amount: i64,
        now: i64,
    ) -> LedgerResult<Order> {
        let batches = self.checked_snapshot(member_id).await?;
        let plan = points::allocate(&batches, now, amount)?;
        let commit = AllocationCommit {
            member_id: member_id.to_string(),
            title: title.to_string(),
            checked_at: now,
            plan,
        };
        Ok(self.gateway.commit_allocation(&commit).await?)
    }

    /// Snapshot for display; inconsistencies are logged, not fatal
    async fn snapshot(&self, member_id: &str) -> LedgerResult<Vec<PointBatch>> {
        let batches = self.gateway.fetch_batches(member_id).await?;
        if let Err(e) = validate_snapshot(member_id, &batches) {
            tracing::warn!(member_id = %member_id, error = %e, "Inconsistent point snapshot");
        }
        Ok(batches)
    }

    /// Snapshot for planning; inconsistencies abort
    async fn checked_snapshot(&self, member_id: &str) -> LedgerResult<Vec<PointBatch>> {
        let batches = self.gateway.fetch_batches(member_id).await?;
        validate_snapshot(member_id, &batches)?;
        Ok(batches)
    }
}

fn batch_views(mut batches: Vec<PointBatch>, now: i64) -> Vec<BatchView> {
    batches.sort_by_key(|b| (b.ended_at, b.id));
    batches
        .into_iter()
        .map(|b| BatchView::at(b, now))
        .collect()
}
