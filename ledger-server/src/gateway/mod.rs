//! Ledger mutation gateway
//!
//! The seam between the pure points core and storage. The core reads a
//! snapshot through [`LedgerGateway::fetch_batches`] and hands back either a
//! [`GrantRequest`] or an [`AllocationCommit`]; the gateway applies it
//! atomically.
//!
//! - [`SqliteGateway`] - production store
//! - [`MemoryGateway`] - in-process store for tests and demos

mod memory;
mod sqlite;

pub use memory::MemoryGateway;
pub use sqlite::SqliteGateway;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{AllocationCommit, GrantRequest, Order, OrderDetail, PointBatch};
use thiserror::Error;

use crate::db::repository::RepoError;

/// Gateway errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Snapshot went stale between planning and commit; retryable
    #[error("Allocation conflict on point batch {batch_id}")]
    Conflict { batch_id: i64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<RepoError> for GatewayError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict { batch_id } => GatewayError::Conflict { batch_id },
            RepoError::NotFound(what) => GatewayError::NotFound(what),
            RepoError::Validation(msg) => GatewayError::Invalid(msg),
            RepoError::Database(msg) => GatewayError::Storage(msg),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Conflict { batch_id } => AppError::allocation_conflict(batch_id),
            GatewayError::NotFound(what) => AppError::not_found(what),
            GatewayError::Invalid(msg) => AppError::invalid_request(msg),
            GatewayError::Storage(msg) => AppError::with_message(ErrorCode::DatabaseError, msg),
        }
    }
}

/// Storage operations the ledger needs
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Every batch of the member, expired and exhausted included
    async fn fetch_batches(&self, member_id: &str) -> GatewayResult<Vec<PointBatch>>;

    /// Create one batch with `used_points = 0`
    async fn commit_grant(&self, request: &GrantRequest) -> GatewayResult<PointBatch>;

    /// Apply a plan atomically, re-checking every batch's remaining points
    /// and expiry against `commit.checked_at`.
    ///
    /// Returns [`GatewayError::Conflict`] and changes nothing if any
    /// re-check fails.
    async fn commit_allocation(&self, commit: &AllocationCommit) -> GatewayResult<Order>;

    /// Order history, newest first
    async fn fetch_orders(&self, member_id: &str) -> GatewayResult<Vec<Order>>;

    async fn fetch_order(&self, member_id: &str, order_id: i64)
    -> GatewayResult<Option<OrderDetail>>;
}
