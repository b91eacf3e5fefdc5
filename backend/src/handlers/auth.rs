//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, AuthTokens, LoginInput, LoginResponse, RefreshInput};
use crate::AppState;
use shared::UserProfile;

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let service = AuthService::new(state.db, state.config.jwt.clone());
    let response = service.login(input).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a fresh token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, state.config.jwt.clone());
    let tokens = service.refresh(input).await?;
    Ok(Json(tokens))
}

/// Get the authenticated user's profile
pub async fn get_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let service = AuthService::new(state.db, state.config.jwt.clone());
    let profile = service.get_profile(current_user.0.user_id).await?;
    Ok(Json(profile))
}
