//! Data models
//!
//! Shared between ledger-server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Timestamps are `i64` Unix millis; batch and order IDs are snowflake `i64`.

pub mod order;
pub mod point;

// Re-exports
pub use order::*;
pub use point::*;
