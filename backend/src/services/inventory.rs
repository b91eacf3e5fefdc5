//! Inventory read service
//!
//! Inventory rows are written only by order approval (stock-in) and weekly
//! settlement (deduction); this service is the read side for the portal.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{IngredientBalance, InventoryItem};

/// Inventory service for stock queries
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    ingredient_id: Uuid,
    ingredient_name: String,
    quantity_gram: Decimal,
    expiration_date: Option<NaiveDate>,
    batch_no: String,
    origin: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for InventoryItem {
    fn from(row: ItemRow) -> Self {
        InventoryItem {
            id: row.id,
            ingredient_id: row.ingredient_id,
            ingredient_name: row.ingredient_name,
            quantity_gram: row.quantity_gram,
            expiration_date: row.expiration_date,
            batch_no: row.batch_no,
            origin: row.origin,
            updated_at: row.updated_at,
        }
    }
}

const ITEM_COLUMNS: &str = "id, ingredient_id, ingredient_name, quantity_gram, \
                            expiration_date, batch_no, origin, updated_at";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List every batch record, grouped by ingredient and soonest expiry first
    pub async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items \
             ORDER BY ingredient_name, expiration_date ASC NULLS LAST"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Aggregated balance for one ingredient across its batches
    pub async fn get_balance(&self, ingredient_id: Uuid) -> AppResult<IngredientBalance> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items \
             WHERE ingredient_id = $1 \
             ORDER BY expiration_date ASC NULLS LAST, id"
        ))
        .bind(ingredient_id)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(AppError::NotFound("Inventory for ingredient".to_string()));
        }

        let batches: Vec<InventoryItem> = rows.into_iter().map(InventoryItem::from).collect();
        let total_gram = batches.iter().map(|b| b.quantity_gram).sum();

        Ok(IngredientBalance {
            ingredient_id,
            ingredient_name: batches[0].ingredient_name.clone(),
            total_gram,
            batches,
        })
    }
}
