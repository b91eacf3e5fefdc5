//! Shared types and models for the School Meal Management Platform
//!
//! This crate contains the domain types shared between the backend and other
//! components of the system, together with the pure workflow logic (line
//! status derivation, merge-add, weekly usage aggregation, deduction
//! planning) so it can be unit-tested without a database.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
