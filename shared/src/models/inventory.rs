//! Inventory models and deduction planning
//!
//! Inventory is kept as batch records: one row per ingredient and batch.
//! Order approval increases a batch (creating it when absent); weekly
//! settlement decreases balances, drawing from batches first-to-expire.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single inventory batch record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub quantity_gram: Decimal,
    pub expiration_date: Option<NaiveDate>,
    pub batch_no: String,
    pub origin: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregated balance of one ingredient across its batches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientBalance {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub total_gram: Decimal,
    pub batches: Vec<InventoryItem>,
}

/// A quantity to subtract from one batch record
#[derive(Debug, Clone, PartialEq)]
pub struct BatchDraw {
    pub item_id: Uuid,
    pub quantity_gram: Decimal,
}

/// Result of planning a deduction against the available batches
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionPlan {
    pub draws: Vec<BatchDraw>,
    /// Quantity that could not be covered; zero on a clean deduction
    pub shortfall_gram: Decimal,
}

impl DeductionPlan {
    pub fn is_clean(&self) -> bool {
        self.shortfall_gram.is_zero()
    }
}

/// Plan how to subtract `total_gram` from the given batches.
///
/// Batches are consumed in the order given (callers pass them
/// first-to-expire). When the batches cannot cover the total, every batch is
/// drained to zero and the remainder is reported as shortfall instead of
/// driving any balance negative.
pub fn plan_deduction(batches: &[(Uuid, Decimal)], total_gram: Decimal) -> DeductionPlan {
    let mut remaining = total_gram;
    let mut draws = Vec::new();

    for (item_id, available) in batches {
        if remaining <= Decimal::ZERO {
            break;
        }
        if *available <= Decimal::ZERO {
            continue;
        }
        let take = remaining.min(*available);
        draws.push(BatchDraw {
            item_id: *item_id,
            quantity_gram: take,
        });
        remaining -= take;
    }

    DeductionPlan {
        draws,
        shortfall_gram: remaining.max(Decimal::ZERO),
    }
}
