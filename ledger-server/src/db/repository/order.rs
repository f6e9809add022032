//! Point Order Repository
//!
//! Orders are written together with their allocation records in one
//! transaction and never modified afterwards.

use super::{RepoError, RepoResult, point_batch};
use shared::models::{AllocationCommit, AllocationRecord, Order, OrderDetail};
use sqlx::SqlitePool;

/// `used_points` is derived from the allocation records, not stored
const ORDER_SELECT: &str = "SELECT o.id, o.member_id, o.title, COALESCE(SUM(a.points), 0) AS used_points, o.created_at FROM point_order o LEFT JOIN order_member_point a ON a.order_id = o.id";

/// Persist an allocation plan atomically.
///
/// Inserts the order, re-checks and consumes every planned batch, then
/// records the allocations. Any failed re-check rolls the whole commit back
/// with [`RepoError::Conflict`].
pub async fn create_with_allocations(
    pool: &SqlitePool,
    commit: &AllocationCommit,
) -> RepoResult<Order> {
    commit.plan.validate().map_err(RepoError::Validation)?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO point_order (id, member_id, title, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(id)
        .bind(&commit.member_id)
        .bind(&commit.title)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    for entry in &commit.plan {
        point_batch::consume(
            &mut tx,
            &commit.member_id,
            entry.batch_id,
            entry.points_consumed,
            commit.checked_at,
        )
        .await?;

        sqlx::query(
            "INSERT INTO order_member_point (order_id, member_point_id, points) VALUES (?1, ?2, ?3)",
        )
        .bind(id)
        .bind(entry.batch_id)
        .bind(entry.points_consumed)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Order {
        id,
        member_id: commit.member_id.clone(),
        title: commit.title.clone(),
        used_points: commit.plan.total(),
        created_at: now,
    })
}

/// Order history of a member, newest first
pub async fn find_by_member(pool: &SqlitePool, member_id: &str) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE o.member_id = ? GROUP BY o.id ORDER BY o.created_at DESC, o.id DESC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Allocation records of one order, in plan order
pub async fn find_allocations(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<AllocationRecord>> {
    let rows = sqlx::query_as::<_, AllocationRecord>(
        "SELECT order_id, member_point_id AS batch_id, points FROM order_member_point WHERE order_id = ? ORDER BY rowid",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// One order with its allocations; `None` if it does not belong to `member_id`
pub async fn find_detail(
    pool: &SqlitePool,
    member_id: &str,
    order_id: i64,
) -> RepoResult<Option<OrderDetail>> {
    let sql = format!("{ORDER_SELECT} WHERE o.id = ? AND o.member_id = ? GROUP BY o.id");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(order_id)
        .bind(member_id)
        .fetch_optional(pool)
        .await?;

    let Some(order) = order else {
        return Ok(None);
    };
    let allocations = find_allocations(pool, order.id).await?;
    Ok(Some(OrderDetail { order, allocations }))
}
