//! Business logic services for the School Meal Management Platform

pub mod auth;
pub mod ingredient;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod plan;
pub mod settlement;

pub use auth::AuthService;
pub use ingredient::IngredientService;
pub use inventory::InventoryService;
pub use notification::NotificationService;
pub use order::OrderService;
pub use plan::PlanService;
pub use settlement::SettlementService;
