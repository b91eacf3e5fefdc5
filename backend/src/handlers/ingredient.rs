//! HTTP handlers for the ingredient catalog

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ingredient::IngredientService;
use crate::AppState;
use shared::Ingredient;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

/// Search the ingredient catalog by name
pub async fn search_ingredients(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let service = IngredientService::new(state.db);
    let ingredients = service.search(&query.keyword).await?;
    Ok(Json(ingredients))
}

/// Get one ingredient by id
pub async fn get_ingredient(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<Ingredient>> {
    let service = IngredientService::new(state.db);
    let ingredient = service.get(ingredient_id).await?;
    Ok(Json(ingredient))
}
