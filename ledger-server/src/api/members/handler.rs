//! Member Points API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    AdjustOutcome, AdjustPoints, BatchView, DeductionPreview, Order, OrderDetail, PointsSummary,
    PreviewDeduction,
};

use crate::core::ServerState;
use crate::utils::validation::{MAX_NAME_LEN, validate_member_id, validate_required_text};
use crate::utils::{ApiResponse, AppResult};

/// GET /api/members/{member_id}/points - 余额总览
pub async fn summary(
    State(state): State<ServerState>,
    Path(member_id): Path<String>,
) -> AppResult<ApiResponse<PointsSummary>> {
    validate_member_id(&member_id)?;
    let now = shared::util::now_millis();
    let summary = state.ledger.summary(&member_id, now).await?;
    Ok(ApiResponse::success(summary))
}

/// GET /api/members/{member_id}/batches - 批次列表 (即将过期的在前)
pub async fn batches(
    State(state): State<ServerState>,
    Path(member_id): Path<String>,
) -> AppResult<ApiResponse<Vec<BatchView>>> {
    validate_member_id(&member_id)?;
    let now = shared::util::now_millis();
    let batches = state.ledger.batches(&member_id, now).await?;
    Ok(ApiResponse::success(batches))
}

/// GET /api/members/{member_id}/orders - 订单历史 (新的在前)
pub async fn orders(
    State(state): State<ServerState>,
    Path(member_id): Path<String>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    validate_member_id(&member_id)?;
    let orders = state.ledger.orders(&member_id).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/members/{member_id}/orders/{order_id} - 订单明细
pub async fn order_detail(
    State(state): State<ServerState>,
    Path((member_id, order_id)): Path<(String, i64)>,
) -> AppResult<ApiResponse<OrderDetail>> {
    validate_member_id(&member_id)?;
    let detail = state.ledger.order_detail(&member_id, order_id).await?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/members/{member_id}/points/adjust - 正数发放, 负数扣减
pub async fn adjust(
    State(state): State<ServerState>,
    Path(member_id): Path<String>,
    Json(payload): Json<AdjustPoints>,
) -> AppResult<ApiResponse<AdjustOutcome>> {
    validate_member_id(&member_id)?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;

    let now = shared::util::now_millis();
    let outcome = state.ledger.adjust(&member_id, payload, now).await?;
    Ok(ApiResponse::success(outcome))
}

/// POST /api/members/{member_id}/points/preview - 扣减预览 (不落库)
pub async fn preview(
    State(state): State<ServerState>,
    Path(member_id): Path<String>,
    Json(payload): Json<PreviewDeduction>,
) -> AppResult<ApiResponse<DeductionPreview>> {
    validate_member_id(&member_id)?;
    let now = shared::util::now_millis();
    let preview = state
        .ledger
        .preview(&member_id, payload.points, now)
        .await?;
    Ok(ApiResponse::success(preview))
}
