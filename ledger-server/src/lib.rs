//! Ledger Server - 会员点数账本
//!
//! # 架构概述
//!
//! - **点数核心** (`points`): 余额计算、扣减分配、发放请求，纯函数
//! - **网关** (`gateway`): 快照读取与原子提交 (SQLite / 内存)
//! - **数据库** (`db`): SQLite 连接池、迁移与仓储
//! - **服务** (`services`): 查询 / 发放 / 扣减编排，冲突时重新规划一次
//! - **HTTP API** (`api`): RESTful 接口, `x-admin-secret` 认证
//!
//! # 模块结构
//!
//! ```text
//! ledger-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── auth/          # 管理密钥中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # LedgerService
//! ├── points/        # 点数核心 (无 I/O)
//! ├── gateway/       # LedgerGateway trait + 实现
//! ├── db/            # SQLite 层
//! └── utils/         # 日志、时间、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod gateway;
pub mod points;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerError, ServerState};
pub use gateway::{LedgerGateway, MemoryGateway, SqliteGateway};
pub use points::PointsError;
pub use services::{LedgerError, LedgerService};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security logging macro (target: `security`)
///
/// ```ignore
/// security_log!(WARN, "auth_failed", uri = ?req.uri());
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*)
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(target: "security", event = $event, $($arg)*)
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*)
    };
}
