//! Domain models for the School Meal Management Platform

mod ingredient;
mod inventory;
mod order;
mod plan;
mod schedule;
mod user;

pub use ingredient::*;
pub use inventory::*;
pub use order::*;
pub use plan::*;
pub use schedule::*;
pub use user::*;
