//! Point Batch Repository

use super::{RepoError, RepoResult};
use serde::Serialize;
use shared::models::{GrantRequest, PointBatch};
use sqlx::{SqliteConnection, SqlitePool};

const BATCH_COLUMNS: &str = "id, member_id, title, points, used_points, ended_at, created_at";

/// `used_points` counter that disagrees with the batch's allocation records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UsageMismatch {
    pub batch_id: i64,
    pub used_points: i64,
    pub allocated: i64,
}

/// All batches of a member (expired and exhausted included)
pub async fn find_by_member(pool: &SqlitePool, member_id: &str) -> RepoResult<Vec<PointBatch>> {
    let sql = format!(
        "SELECT {BATCH_COLUMNS} FROM member_point WHERE member_id = ? ORDER BY ended_at, id"
    );
    let rows = sqlx::query_as::<_, PointBatch>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PointBatch>> {
    let sql = format!("SELECT {BATCH_COLUMNS} FROM member_point WHERE id = ?");
    let row = sqlx::query_as::<_, PointBatch>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a fresh batch with `used_points = 0`
pub async fn create(pool: &SqlitePool, request: &GrantRequest) -> RepoResult<PointBatch> {
    if request.points <= 0 {
        return Err(RepoError::Validation(format!(
            "points must be positive, got {}",
            request.points
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO member_point (id, member_id, title, points, used_points, ended_at, created_at) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
    )
    .bind(id)
    .bind(&request.member_id)
    .bind(&request.title)
    .bind(request.points)
    .bind(request.ended_at)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create point batch".into()))
}

/// Consume `points` from one batch inside the caller's transaction.
///
/// The row is only touched if it still belongs to `member_id`, is not
/// expired at `checked_at` and has at least `points` remaining.
pub async fn consume(
    conn: &mut SqliteConnection,
    member_id: &str,
    batch_id: i64,
    points: i64,
    checked_at: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE member_point SET used_points = used_points + ?1 WHERE id = ?2 AND member_id = ?3 AND ended_at >= ?4 AND points - used_points >= ?1",
    )
    .bind(points)
    .bind(batch_id)
    .bind(member_id)
    .bind(checked_at)
    .execute(conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict { batch_id });
    }
    Ok(())
}

/// Batches whose stored `used_points` differs from the sum of their allocation records
pub async fn reconcile_used_points(
    pool: &SqlitePool,
    member_id: &str,
) -> RepoResult<Vec<UsageMismatch>> {
    let rows = sqlx::query_as::<_, UsageMismatch>(
        "SELECT mp.id AS batch_id, mp.used_points, COALESCE(SUM(omp.points), 0) AS allocated FROM member_point mp LEFT JOIN order_member_point omp ON omp.member_point_id = mp.id WHERE mp.member_id = ? GROUP BY mp.id, mp.used_points HAVING mp.used_points != COALESCE(SUM(omp.points), 0) ORDER BY mp.id",
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_batch, test_pool};

    const NOW: i64 = 1_790_000_000_000;

    fn grant_request(member_id: &str, points: i64) -> GrantRequest {
        GrantRequest {
            member_id: member_id.to_string(),
            title: "週年慶".to_string(),
            points,
            ended_at: NOW + 1000,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let batch = create(&pool, &grant_request("m-1", 50)).await.unwrap();
        assert_eq!(batch.points, 50);
        assert_eq!(batch.used_points, 0);
        assert_eq!(batch.title, "週年慶");

        let found = find_by_member(&pool, "m-1").await.unwrap();
        assert_eq!(found, vec![batch]);
        assert!(find_by_member(&pool, "m-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive() {
        let pool = test_pool().await;
        let err = create(&pool, &grant_request("m-1", 0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_by_member_orders_by_expiry() {
        let pool = test_pool().await;
        seed_batch(&pool, 1, "m-1", 10, 0, NOW + 300).await;
        seed_batch(&pool, 2, "m-1", 10, 0, NOW + 100).await;
        seed_batch(&pool, 3, "m-1", 10, 0, NOW + 200).await;

        let ids: Vec<i64> = find_by_member(&pool, "m-1")
            .await
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_consume_guards() {
        let pool = test_pool().await;
        seed_batch(&pool, 1, "m-1", 10, 4, NOW).await;

        let mut conn = pool.acquire().await.unwrap();

        // more than remaining
        let err = consume(&mut conn, "m-1", 1, 7, NOW).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict { batch_id: 1 }));

        // wrong member
        assert!(consume(&mut conn, "m-2", 1, 1, NOW).await.is_err());

        // expired by one millisecond
        assert!(consume(&mut conn, "m-1", 1, 1, NOW + 1).await.is_err());

        // exact remaining at the inclusive boundary
        consume(&mut conn, "m-1", 1, 6, NOW).await.unwrap();
        drop(conn);

        let batch = find_by_id(&pool, 1).await.unwrap().unwrap();
        assert_eq!(batch.used_points, 10);
    }

    #[tokio::test]
    async fn test_reconcile_reports_drift() {
        let pool = test_pool().await;
        seed_batch(&pool, 1, "m-1", 10, 0, NOW).await;
        seed_batch(&pool, 2, "m-1", 10, 3, NOW).await;

        let mismatches = reconcile_used_points(&pool, "m-1").await.unwrap();
        assert_eq!(
            mismatches,
            vec![UsageMismatch {
                batch_id: 2,
                used_points: 3,
                allocated: 0,
            }]
        );
    }
}
