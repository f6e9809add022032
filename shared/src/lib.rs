//! Shared types for the point ledger
//!
//! Types used by both the ledger server and its API consumers:
//! point batch / order models, the unified error system and small
//! utilities (timestamps, snowflake IDs).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
