//! Weekly menu schedule models and settlement aggregation
//!
//! A schedule covers one menu week. After the week ends, the kitchen settles
//! inventory once: actual ingredient usage is summed across every daily meal
//! and deducted from stock. The `is_inventory_deducted` flag flips false to
//! true exactly once and is never reset.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A menu week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// Settlement-applied flag; true is terminal
    pub is_inventory_deducted: bool,
    pub created_at: DateTime<Utc>,
}

/// One day's meal within a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMeal {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_name: String,
}

/// Actual ingredient usage recorded against a daily meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealIngredientUsage {
    pub daily_meal_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub actual_quantity_used_gram: Decimal,
}

/// A schedule with its meals and usages, as served to the kitchen portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWithMeals {
    #[serde(flatten)]
    pub schedule: WeeklySchedule,
    pub daily_meals: Vec<DailyMeal>,
    pub usages: Vec<MealIngredientUsage>,
}

/// Total actual usage of one ingredient across a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedUsage {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub total_gram: Decimal,
}

/// Outcome of a weekly settlement, as returned to the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResult {
    pub schedule_id: Uuid,
    pub is_success: bool,
    /// Set when some ingredients were missing or short; the settlement still
    /// completed for everything else
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SettlementResult {
    /// Operator-facing summary line in English, used by the notification
    /// fan-out after settlement.
    pub fn summary_en(&self) -> String {
        match &self.warning {
            Some(warning) => format!("Weekly inventory settled with warnings: {}", warning),
            None => "Weekly inventory settled successfully".to_string(),
        }
    }

    /// Operator-facing summary line in Vietnamese.
    pub fn summary_vi(&self) -> String {
        match &self.warning {
            Some(warning) => format!("Đã trừ kho tuần với cảnh báo: {}", warning),
            None => "Đã trừ kho tuần thành công".to_string(),
        }
    }
}

/// Sum actual usage per distinct ingredient across all daily meals.
///
/// Zero-quantity entries contribute nothing but do not create an aggregate on
/// their own. The result is ordered by ingredient id for determinism.
pub fn aggregate_weekly_usage(usages: &[MealIngredientUsage]) -> Vec<AggregatedUsage> {
    let mut totals: BTreeMap<Uuid, AggregatedUsage> = BTreeMap::new();

    for usage in usages {
        totals
            .entry(usage.ingredient_id)
            .and_modify(|agg| agg.total_gram += usage.actual_quantity_used_gram)
            .or_insert_with(|| AggregatedUsage {
                ingredient_id: usage.ingredient_id,
                ingredient_name: usage.ingredient_name.clone(),
                total_gram: usage.actual_quantity_used_gram,
            });
    }

    totals
        .into_values()
        .filter(|agg| agg.total_gram > Decimal::ZERO)
        .collect()
}
