//! In-process gateway (同进程存储，测试 / demo 用)

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    AllocationCommit, AllocationRecord, GrantRequest, Order, OrderDetail, PointBatch,
};

use super::{GatewayError, GatewayResult, LedgerGateway};

#[derive(Debug, Default)]
struct LedgerTables {
    batches: Vec<PointBatch>,
    orders: Vec<Order>,
    allocations: Vec<AllocationRecord>,
}

/// Mutex-guarded tables; every commit runs under one lock so it is atomic.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: Mutex<LedgerTables>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a batch as-is (used points and ids included)
    pub fn insert_batch(&self, batch: PointBatch) {
        self.tables.lock().batches.push(batch);
    }

    /// Overwrite a batch's used points, simulating a concurrent writer
    pub fn set_used_points(&self, batch_id: i64, used_points: i64) {
        let mut tables = self.tables.lock();
        if let Some(batch) = tables.batches.iter_mut().find(|b| b.id == batch_id) {
            batch.used_points = used_points;
        }
    }
}

#[async_trait]
impl LedgerGateway for MemoryGateway {
    async fn fetch_batches(&self, member_id: &str) -> GatewayResult<Vec<PointBatch>> {
        let tables = self.tables.lock();
        let mut batches: Vec<PointBatch> = tables
            .batches
            .iter()
            .filter(|b| b.member_id == member_id)
            .cloned()
            .collect();
        batches.sort_by_key(|b| (b.ended_at, b.id));
        Ok(batches)
    }

    async fn commit_grant(&self, request: &GrantRequest) -> GatewayResult<PointBatch> {
        if request.points <= 0 {
            return Err(GatewayError::Invalid(format!(
                "points must be positive, got {}",
                request.points
            )));
        }
        let batch = PointBatch {
            id: shared::util::snowflake_id(),
            member_id: request.member_id.clone(),
            title: request.title.clone(),
            points: request.points,
            used_points: 0,
            ended_at: request.ended_at,
            created_at: shared::util::now_millis(),
        };
        self.tables.lock().batches.push(batch.clone());
        Ok(batch)
    }

    async fn commit_allocation(&self, commit: &AllocationCommit) -> GatewayResult<Order> {
        commit.plan.validate().map_err(GatewayError::Invalid)?;

        let mut tables = self.tables.lock();

        // Re-check everything before touching anything
        for entry in &commit.plan {
            let covered = tables.batches.iter().any(|b| {
                b.id == entry.batch_id
                    && b.member_id == commit.member_id
                    && b.is_usable_at(commit.checked_at)
                    && b.remaining() >= entry.points_consumed
            });
            if !covered {
                return Err(GatewayError::Conflict {
                    batch_id: entry.batch_id,
                });
            }
        }

        let order = Order {
            id: shared::util::snowflake_id(),
            member_id: commit.member_id.clone(),
            title: commit.title.clone(),
            used_points: commit.plan.total(),
            created_at: shared::util::now_millis(),
        };

        for entry in &commit.plan {
            if let Some(batch) = tables.batches.iter_mut().find(|b| b.id == entry.batch_id) {
                batch.used_points += entry.points_consumed;
            }
            tables.allocations.push(AllocationRecord {
                order_id: order.id,
                batch_id: entry.batch_id,
                points: entry.points_consumed,
            });
        }
        tables.orders.push(order.clone());

        Ok(order)
    }

    async fn fetch_orders(&self, member_id: &str) -> GatewayResult<Vec<Order>> {
        let tables = self.tables.lock();
        let mut orders: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| o.member_id == member_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn fetch_order(
        &self,
        member_id: &str,
        order_id: i64,
    ) -> GatewayResult<Option<OrderDetail>> {
        let tables = self.tables.lock();
        let Some(order) = tables
            .orders
            .iter()
            .find(|o| o.id == order_id && o.member_id == member_id)
            .cloned()
        else {
            return Ok(None);
        };
        let allocations = tables
            .allocations
            .iter()
            .filter(|a| a.order_id == order_id)
            .cloned()
            .collect();
        Ok(Some(OrderDetail { order, allocations }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{AllocationEntry, AllocationPlan};

    const NOW: i64 = 1_790_000_000_000;

    fn batch(id: i64, points: i64, used_points: i64, ended_at: i64) -> PointBatch {
        PointBatch {
            id,
            member_id: "m-1".to_string(),
            title: format!("batch {id}"),
            points,
            used_points,
            ended_at,
            created_at: 0,
        }
    }

    fn commit(entries: &[(i64, i64)]) -> AllocationCommit {
        AllocationCommit {
            member_id: "m-1".to_string(),
            title: "兌換".to_string(),
            checked_at: NOW,
            plan: AllocationPlan {
                entries: entries
                    .iter()
                    .map(|&(batch_id, points_consumed)| AllocationEntry {
                        batch_id,
                        points_consumed,
                    })
                    .collect(),
            },
        }
    }

    #[tokio::test]
    async fn test_commit_is_all_or_nothing() {
        let gateway = MemoryGateway::new();
        gateway.insert_batch(batch(1, 10, 0, NOW + 10));
        gateway.insert_batch(batch(2, 5, 4, NOW + 10));

        let err = gateway
            .commit_allocation(&commit(&[(1, 5), (2, 5)]))
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Conflict { batch_id: 2 });

        let batches = gateway.fetch_batches("m-1").await.unwrap();
        let used: Vec<(i64, i64)> = batches.iter().map(|b| (b.id, b.used_points)).collect();
        assert_eq!(used, vec![(1, 0), (2, 4)]);
        assert!(gateway.fetch_orders("m-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_applies_and_records() {
        let gateway = MemoryGateway::new();
        gateway.insert_batch(batch(1, 10, 0, NOW));

        let order = gateway.commit_allocation(&commit(&[(1, 6)])).await.unwrap();
        assert_eq!(order.used_points, 6);

        let batches = gateway.fetch_batches("m-1").await.unwrap();
        assert_eq!(batches[0].used_points, 6);

        let detail = gateway.fetch_order("m-1", order.id).await.unwrap().unwrap();
        assert_eq!(detail.allocations.len(), 1);
        assert!(gateway.fetch_order("m-2", order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_named_twice_rejected_untouched() {
        let gateway = MemoryGateway::new();
        gateway.insert_batch(batch(1, 10, 0, NOW + 10));

        let err = gateway
            .commit_allocation(&commit(&[(1, 6), (1, 6)]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid(_)));

        let batches = gateway.fetch_batches("m-1").await.unwrap();
        assert_eq!(batches[0].used_points, 0);
        assert!(gateway.fetch_orders("m-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_entry_rejected() {
        let gateway = MemoryGateway::new();
        gateway.insert_batch(batch(1, 10, 0, NOW + 10));
        let err = gateway
            .commit_allocation(&commit(&[(1, 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid(_)));
        let err = gateway
            .commit_allocation(&commit(&[(1, -4)]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid(_)));
        assert_eq!(gateway.fetch_batches("m-1").await.unwrap()[0].used_points, 0);
    }

    #[tokio::test]
    async fn test_expired_at_commit_conflicts() {
        let gateway = MemoryGateway::new();
        gateway.insert_batch(batch(1, 10, 0, NOW - 1));
        let err = gateway.commit_allocation(&commit(&[(1, 1)])).await.unwrap_err();
        assert_eq!(err, GatewayError::Conflict { batch_id: 1 });
    }
}
