//! Repository Module
//!
//! Free async functions over `&SqlitePool`, one file per table group.

pub mod order;
pub mod point_batch;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Commit-time re-check failed: the batch no longer covers the planned points
    #[error("Point batch {batch_id} no longer covers the planned consumption")]
    Conflict { batch_id: i64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::DbService;
    use sqlx::SqlitePool;

    pub async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    /// Insert a batch row directly, bypassing grant validation
    pub async fn seed_batch(
        pool: &SqlitePool,
        id: i64,
        member_id: &str,
        points: i64,
        used_points: i64,
        ended_at: i64,
    ) {
        sqlx::query(
            "INSERT INTO member_point (id, member_id, title, points, used_points, ended_at, created_at) VALUES (?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(id)
        .bind(member_id)
        .bind(format!("batch {id}"))
        .bind(points)
        .bind(used_points)
        .bind(ended_at)
        .execute(pool)
        .await
        .unwrap();
    }
}
