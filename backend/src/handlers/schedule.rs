//! HTTP handlers for weekly schedule and settlement endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::notification::{NotificationContent, NotificationService};
use crate::services::settlement::SettlementService;
use crate::AppState;
use shared::{ScheduleWithMeals, SettlementResult, UserRole, WeeklySchedule};

/// List weekly schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<WeeklySchedule>>> {
    let service = SettlementService::new(state.db);
    let schedules = service.list_schedules().await?;
    Ok(Json(schedules))
}

/// Get a schedule with its meals and recorded usages
pub async fn get_schedule(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(schedule_id): Path<Uuid>,
) -> AppResult<Json<ScheduleWithMeals>> {
    let service = SettlementService::new(state.db);
    let schedule = service.get_schedule(schedule_id).await?;
    Ok(Json(schedule))
}

/// Run the once-per-week inventory settlement for a schedule
pub async fn settle_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(schedule_id): Path<Uuid>,
) -> AppResult<Json<SettlementResult>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;
    let service = SettlementService::new(state.db.clone());
    let result = service.consume_inventory_for_week(schedule_id).await?;

    notify_settlement_event(&state, &result).await;

    Ok(Json(result))
}

/// Fan out a completed settlement as in-app notifications plus a push
/// message. Runs after the settlement transaction committed; failures here
/// are logged and never turn the settlement into an error.
async fn notify_settlement_event(state: &AppState, result: &SettlementResult) {
    let message = result.summary_en();
    let message_vi = result.summary_vi();

    let notifications = NotificationService::new(state.db.clone());
    if let Err(e) = notifications
        .notify_roles(
            &[UserRole::Manager, UserRole::Admin],
            NotificationContent {
                title: "Weekly inventory settled",
                title_vi: "Đã trừ kho tuần",
                message: &message,
                message_vi: &message_vi,
                entity_type: "weekly_schedule",
                entity_id: result.schedule_id,
            },
        )
        .await
    {
        tracing::warn!("Failed to insert settlement notifications: {}", e);
    }

    let push = state.push.clone();
    let schedule_id = result.schedule_id;
    tokio::spawn(async move {
        push.send(
            "Đã trừ kho tuần",
            &message_vi,
            "weekly_schedule",
            schedule_id,
        )
        .await;
    });
}
