//! Ingredient catalog service

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::Ingredient;

/// Ingredient service for the catalog used by plan editing
#[derive(Clone)]
pub struct IngredientService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    id: Uuid,
    name: String,
    category: Option<String>,
    default_unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            name: row.name,
            category: row.category,
            default_unit: row.default_unit,
        }
    }
}

impl IngredientService {
    /// Create a new IngredientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Search the catalog by name, case-insensitive substring match
    pub async fn search(&self, keyword: &str) -> AppResult<Vec<Ingredient>> {
        let pattern = format!("%{}%", keyword.trim());

        let rows = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, name, category, default_unit FROM ingredients \
             WHERE name ILIKE $1 ORDER BY name LIMIT 50",
        )
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    /// Get one ingredient by id
    pub async fn get(&self, id: Uuid) -> AppResult<Ingredient> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, name, category, default_unit FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        Ok(row.into())
    }
}
