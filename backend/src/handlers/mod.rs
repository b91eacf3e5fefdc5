//! HTTP handlers for the School Meal Management Platform

pub mod auth;
pub mod ingredient;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod plan;
pub mod schedule;

pub use auth::*;
pub use ingredient::*;
pub use inventory::*;
pub use notification::*;
pub use order::*;
pub use plan::*;
pub use schedule::*;
