//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::InventoryService;
use crate::AppState;
use shared::{IngredientBalance, InventoryItem};

/// List every inventory batch record
pub async fn list_inventory_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Get the aggregated balance for one ingredient
pub async fn get_ingredient_balance(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<IngredientBalance>> {
    let service = InventoryService::new(state.db);
    let balance = service.get_balance(ingredient_id).await?;
    Ok(Json(balance))
}
