//! HTTP handlers for purchase plan endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::plan::{AddLineInput, PlanService, SaveDraftInput, UpdateLineInput};
use crate::AppState;
use shared::{PlanLine, PlanWithLines, UserRole};

#[derive(Debug, Deserialize)]
pub struct PlanDateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanInput {
    pub plan_date: NaiveDate,
}

/// Get the plan for a date; null body when no plan exists yet
pub async fn get_plan_by_date(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PlanDateQuery>,
) -> AppResult<Json<Option<PlanWithLines>>> {
    let service = PlanService::new(state.db);
    let plan = service.get_plan_by_date(query.date).await?;
    Ok(Json(plan))
}

/// Create an empty Draft plan for a date
pub async fn create_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePlanInput>,
) -> AppResult<Json<PlanWithLines>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;
    let service = PlanService::new(state.db);
    let plan = service.create_plan(input.plan_date).await?;
    Ok(Json(plan))
}

/// Add a line to a plan, merging with an existing line for the same ingredient
pub async fn add_plan_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(input): Json<AddLineInput>,
) -> AppResult<Json<PlanLine>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;
    let service = PlanService::new(state.db);
    let line = service.add_or_merge_line(plan_id, input).await?;
    Ok(Json(line))
}

/// Edit a plan line's price, batch number, or origin
pub async fn update_plan_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((plan_id, line_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateLineInput>,
) -> AppResult<Json<PlanLine>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;
    let service = PlanService::new(state.db);
    let line = service.update_line(plan_id, line_id, input).await?;
    Ok(Json(line))
}

/// Remove a line from a plan
pub async fn remove_plan_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((plan_id, line_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<()>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;
    let service = PlanService::new(state.db);
    service.remove_line(plan_id, line_id).await?;
    Ok(Json(()))
}

/// Persist the client's working copy of the line set
pub async fn save_plan_draft(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(input): Json<SaveDraftInput>,
) -> AppResult<Json<PlanWithLines>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;
    let service = PlanService::new(state.db);
    let plan = service.save_draft(plan_id, input).await?;
    Ok(Json(plan))
}

/// Delete a Draft plan and its lines
pub async fn delete_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_role(&current_user.0, UserRole::can_operate_kitchen)?;
    let service = PlanService::new(state.db);
    service.delete_plan(plan_id).await?;
    Ok(Json(()))
}
