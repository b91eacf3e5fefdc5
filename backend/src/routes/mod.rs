//! Route definitions for the School Meal Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth routes (public login/refresh, protected profile)
        .nest("/auth", auth_routes())
        // Protected routes - purchase plans
        .nest("/plans", plan_routes())
        // Protected routes - purchase orders
        .nest("/orders", order_routes())
        // Protected routes - inventory
        .nest("/inventory", inventory_routes())
        // Protected routes - weekly schedules and settlement
        .nest("/schedules", schedule_routes())
        // Protected routes - ingredient catalog
        .nest("/ingredients", ingredient_routes())
        // Protected routes - in-app notifications
        .nest("/notifications", notification_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .nest("/me", me_routes())
}

fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_me))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase plan routes (protected)
fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_plan_by_date).post(handlers::create_plan))
        .route(
            "/:plan_id",
            put(handlers::save_plan_draft).delete(handlers::delete_plan),
        )
        .route("/:plan_id/lines", post(handlers::add_plan_line))
        .route(
            "/:plan_id/lines/:line_id",
            put(handlers::update_plan_line).delete(handlers::remove_plan_line),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/confirm", post(handlers::approve_order))
        .route("/:order_id/reject", post(handlers::reject_order))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_inventory_items))
        .route("/:ingredient_id", get(handlers::get_ingredient_balance))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Weekly schedule and settlement routes (protected)
fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_schedules))
        .route("/:schedule_id", get(handlers::get_schedule))
        .route(
            "/:schedule_id/consume-inventory",
            post(handlers::settle_schedule),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Ingredient catalog routes (protected)
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::search_ingredients))
        .route("/:ingredient_id", get(handlers::get_ingredient))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// In-app notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_notifications))
        .route("/unread-count", get(handlers::get_unread_count))
        .route("/:notification_id/read", post(handlers::mark_notification_read))
        .route_layer(middleware::from_fn(auth_middleware))
}
