//! Ingredient catalog models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog ingredient, searchable by keyword from the plan editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub default_unit: String,
}
