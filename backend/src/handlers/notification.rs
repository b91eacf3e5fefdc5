//! HTTP handlers for in-app notifications

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::Notification;
use crate::services::notification::NotificationService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// List the authenticated user's notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let service = NotificationService::new(state.db);
    let notifications = service.list_for_user(current_user.0.user_id).await?;
    Ok(Json(notifications))
}

/// Count the authenticated user's unread notifications
pub async fn get_unread_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UnreadCountResponse>> {
    let service = NotificationService::new(state.db);
    let unread_count = service.unread_count(current_user.0.user_id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// Mark one notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = NotificationService::new(state.db);
    service
        .mark_read(current_user.0.user_id, notification_id)
        .await?;
    Ok(Json(()))
}
