//! SQLite-backed gateway

use async_trait::async_trait;
use shared::models::{AllocationCommit, GrantRequest, Order, OrderDetail, PointBatch};
use sqlx::SqlitePool;

use super::{GatewayResult, LedgerGateway};
use crate::db::repository::point_batch::UsageMismatch;
use crate::db::repository::{order, point_batch};

#[derive(Clone)]
pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Batches whose stored counter drifted from their allocation records
    pub async fn reconcile_used_points(&self, member_id: &str) -> GatewayResult<Vec<UsageMismatch>> {
        Ok(point_batch::reconcile_used_points(&self.pool, member_id).await?)
    }
}

#[async_trait]
impl LedgerGateway for SqliteGateway {
    async fn fetch_batches(&self, member_id: &str) -> GatewayResult<Vec<PointBatch>> {
        Ok(point_batch::find_by_member(&self.pool, member_id).await?)
    }

    async fn commit_grant(&self, request: &GrantRequest) -> GatewayResult<PointBatch> {
        let batch = point_batch::create(&self.pool, request).await?;
        tracing::info!(
            member_id = %batch.member_id,
            batch_id = batch.id,
            points = batch.points,
            ended_at = batch.ended_at,
            "Point batch granted"
        );
        Ok(batch)
    }

    async fn commit_allocation(&self, commit: &AllocationCommit) -> GatewayResult<Order> {
        let order = order::create_with_allocations(&self.pool, commit).await?;
        tracing::info!(
            member_id = %order.member_id,
            order_id = order.id,
            used_points = order.used_points,
            batches = commit.plan.len(),
            "Point order committed"
        );
        Ok(order)
    }

    async fn fetch_orders(&self, member_id: &str) -> GatewayResult<Vec<Order>> {
        Ok(order::find_by_member(&self.pool, member_id).await?)
    }

    async fn fetch_order(
        &self,
        member_id: &str,
        order_id: i64,
    ) -> GatewayResult<Option<OrderDetail>> {
        Ok(order::find_detail(&self.pool, member_id, order_id).await?)
    }
}
