//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公开)
//! - [`members`] - 会员点数接口 (需要 `x-admin-secret`)

pub mod health;
pub mod members;

use std::time::Duration;

use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", elapsed_ms, "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(members::router(state.clone()))
}

/// Full application: routes, middleware stack and state
pub fn build_router(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    with_middleware(build_app(&state), timeout).with_state(state)
}

/// Request id, tracing, access log, timeout (408) and CORS
fn with_middleware(router: Router<ServerState>, timeout: Duration) -> Router<ServerState> {
    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(log_request))
                .layer(TimeoutLayer::with_status_code(
                    http::StatusCode::REQUEST_TIMEOUT,
                    timeout,
                )),
        )
        .layer(CorsLayer::permissive())
}
