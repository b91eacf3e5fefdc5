//! Database models for the School Meal Management Platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

mod notification;

pub use notification::Notification;
pub use shared::models::*;
