//! 认证模块
//!
//! 管理接口只有一种凭证: `x-admin-secret` 请求头。
//! - [`require_admin_secret`] - 认证中间件

pub mod middleware;

pub use middleware::{ADMIN_SECRET_HEADER, require_admin_secret};
