//! Member points API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/members/{member_id}/points | GET | 余额 + 批次 + 订单 |
//! | /api/members/{member_id}/batches | GET | 批次列表 |
//! | /api/members/{member_id}/orders | GET | 订单历史 |
//! | /api/members/{member_id}/orders/{order_id} | GET | 订单明细 |
//! | /api/members/{member_id}/points/adjust | POST | 发放 / 扣减 |
//! | /api/members/{member_id}/points/preview | POST | 扣减预览 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin_secret;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/members", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/{member_id}/points", get(handler::summary))
        .route("/{member_id}/batches", get(handler::batches))
        .route("/{member_id}/orders", get(handler::orders))
        .route("/{member_id}/orders/{order_id}", get(handler::order_detail))
        .route("/{member_id}/points/adjust", post(handler::adjust))
        .route("/{member_id}/points/preview", post(handler::preview))
        .route_layer(middleware::from_fn_with_state(state, require_admin_secret))
}
