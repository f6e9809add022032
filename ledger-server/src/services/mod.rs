//! 服务层
//!
//! - [`LedgerService`] - 点数查询 / 发放 / 扣减编排

pub mod ledger;

pub use ledger::{LedgerError, LedgerResult, LedgerService};
