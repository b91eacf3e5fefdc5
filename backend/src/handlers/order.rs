//! HTTP handlers for purchase order endpoints
//!
//! Order creation is a multipart request: a required `payload` JSON part and
//! an optional `bill_image` file part stored before the workflow runs.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{require_role, CurrentUser};
use crate::services::notification::{NotificationContent, NotificationService};
use crate::services::order::{ConfirmPlanInput, OrderService};
use crate::AppState;
use shared::{OrderWithLines, PaginatedResponse, Pagination, PurchaseOrder, UserRole};

/// Create a purchase order from a Draft plan (multipart)
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<OrderWithLines>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;

    let mut payload: Option<ConfirmPlanInput> = None;
    let mut bill_image_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart request: {}", e)))?
    {
        match field.name() {
            Some("payload") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Invalid payload part: {}", e)))?;
                payload = Some(serde_json::from_str(&text).map_err(|e| {
                    AppError::ValidationError(format!("Invalid payload JSON: {}", e))
                })?);
            }
            Some("bill_image") => {
                let file_name = field.file_name().unwrap_or("bill.jpg").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::ValidationError(format!("Invalid bill image part: {}", e))
                })?;
                bill_image_url = Some(state.storage.store_bill_image(&file_name, &bytes).await?);
            }
            _ => {}
        }
    }

    let input = payload.ok_or_else(|| {
        AppError::ValidationError("Missing payload part in multipart request".to_string())
    })?;

    let service = OrderService::new(state.db.clone());
    let result = service.confirm_plan_to_order(input, bill_image_url).await?;

    notify_order_event(
        &state,
        &[UserRole::Manager, UserRole::Admin],
        "Purchase order awaiting approval",
        "Đơn mua hàng đang chờ duyệt",
        &format!("Order from supplier {} needs a decision", result.order.supplier_name),
        &format!("Đơn hàng từ {} cần được duyệt", result.order.supplier_name),
        result.order.id,
    )
    .await;

    Ok(Json(result))
}

/// List purchase orders, paginated
pub async fn list_orders(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PaginatedResponse<PurchaseOrder>>> {
    let service = OrderService::new(state.db);
    let orders = service.list_orders(pagination).await?;
    Ok(Json(orders))
}

/// Get an order with its lines
pub async fn get_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithLines>> {
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Approve a pending order and stock its lines into inventory
pub async fn approve_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithLines>> {
    require_role(&current_user.0, UserRole::can_resolve_orders)?;

    let service = OrderService::new(state.db.clone());
    let result = service.approve_order(order_id).await?;

    notify_order_event(
        &state,
        &[UserRole::Kitchen],
        "Purchase order approved",
        "Đơn mua hàng đã được duyệt",
        &format!("Order from supplier {} was approved and stocked in", result.order.supplier_name),
        &format!("Đơn hàng từ {} đã được duyệt và nhập kho", result.order.supplier_name),
        result.order.id,
    )
    .await;

    Ok(Json(result))
}

/// Reject a pending order
pub async fn reject_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithLines>> {
    require_role(&current_user.0, UserRole::can_resolve_orders)?;

    let service = OrderService::new(state.db.clone());
    let result = service.reject_order(order_id).await?;

    notify_order_event(
        &state,
        &[UserRole::Kitchen],
        "Purchase order rejected",
        "Đơn mua hàng bị từ chối",
        &format!("Order from supplier {} was rejected", result.order.supplier_name),
        &format!("Đơn hàng từ {} đã bị từ chối", result.order.supplier_name),
        result.order.id,
    )
    .await;

    Ok(Json(result))
}

/// Fan out an order event as in-app notifications plus a push message.
///
/// Runs after the workflow transaction committed; failures here are logged
/// and never turn a successful workflow call into an error.
async fn notify_order_event(
    state: &AppState,
    roles: &[UserRole],
    title: &str,
    title_vi: &str,
    message: &str,
    message_vi: &str,
    order_id: Uuid,
) {
    let notifications = NotificationService::new(state.db.clone());
    if let Err(e) = notifications
        .notify_roles(
            roles,
            NotificationContent {
                title,
                title_vi,
                message,
                message_vi,
                entity_type: "purchase_order",
                entity_id: order_id,
            },
        )
        .await
    {
        tracing::warn!("Failed to insert order notifications: {}", e);
    }

    let push = state.push.clone();
    let title = title_vi.to_string();
    let body = message_vi.to_string();
    tokio::spawn(async move {
        push.send(&title, &body, "purchase_order", order_id).await;
    });
}
