//! Weekly inventory settlement service
//!
//! Settlement runs at most once per schedule. The `is_inventory_deducted`
//! flag is flipped with a guarded update at the start of the transaction, so
//! a concurrent second attempt loses the guard and gets an already-settled
//! error while the first one proceeds.
//!
//! Per-ingredient problems (no stock record, insufficient stock) never abort
//! the settlement; they are collected into a warning string instead.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    aggregate_weekly_usage, plan_deduction, DailyMeal, MealIngredientUsage, ScheduleWithMeals,
    SettlementResult, WeeklySchedule,
};

/// Settlement service for end-of-week inventory deduction
#[derive(Clone)]
pub struct SettlementService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: Uuid,
    week_start: NaiveDate,
    week_end: NaiveDate,
    is_inventory_deducted: bool,
    created_at: DateTime<Utc>,
}

impl From<ScheduleRow> for WeeklySchedule {
    fn from(row: ScheduleRow) -> Self {
        WeeklySchedule {
            id: row.id,
            week_start: row.week_start,
            week_end: row.week_end,
            is_inventory_deducted: row.is_inventory_deducted,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UsageRow {
    daily_meal_id: Uuid,
    ingredient_id: Uuid,
    ingredient_name: String,
    actual_quantity_used_gram: Decimal,
}

impl From<UsageRow> for MealIngredientUsage {
    fn from(row: UsageRow) -> Self {
        MealIngredientUsage {
            daily_meal_id: row.daily_meal_id,
            ingredient_id: row.ingredient_id,
            ingredient_name: row.ingredient_name,
            actual_quantity_used_gram: row.actual_quantity_used_gram,
        }
    }
}

const SCHEDULE_COLUMNS: &str = "id, week_start, week_end, is_inventory_deducted, created_at";

impl SettlementService {
    /// Create a new SettlementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Deduct the week's aggregated actual usage from inventory, once.
    pub async fn consume_inventory_for_week(&self, schedule_id: Uuid) -> AppResult<SettlementResult> {
        let mut tx = self.db.begin().await?;

        // Guard: flip the flag only if it is still false
        let flipped = sqlx::query(
            "UPDATE weekly_schedules SET is_inventory_deducted = TRUE \
             WHERE id = $1 AND is_inventory_deducted = FALSE",
        )
        .bind(schedule_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM weekly_schedules WHERE id = $1)",
            )
            .bind(schedule_id)
            .fetch_one(&self.db)
            .await?;

            return Err(if exists {
                AppError::AlreadySettled(
                    "Tồn kho của tuần này đã được trừ trước đó".to_string(),
                )
            } else {
                AppError::NotFound("Schedule".to_string())
            });
        }

        let usages = self.fetch_usages(&mut tx, schedule_id).await?;
        let aggregated = aggregate_weekly_usage(&usages);

        #[derive(sqlx::FromRow)]
        struct BatchRow {
            id: Uuid,
            quantity_gram: Decimal,
        }

        let mut warnings: Vec<String> = Vec::new();

        for usage in &aggregated {
            // First-to-expire ordering; id as a stable tiebreaker
            let batches = sqlx::query_as::<_, BatchRow>(
                "SELECT id, quantity_gram FROM inventory_items \
                 WHERE ingredient_id = $1 \
                 ORDER BY expiration_date ASC NULLS LAST, id \
                 FOR UPDATE",
            )
            .bind(usage.ingredient_id)
            .fetch_all(&mut *tx)
            .await?;

            if batches.is_empty() {
                warnings.push(format!(
                    "{}: không có bản ghi tồn kho, đã bỏ qua",
                    usage.ingredient_name
                ));
                continue;
            }

            let available: Vec<(Uuid, Decimal)> =
                batches.iter().map(|b| (b.id, b.quantity_gram)).collect();
            let plan = plan_deduction(&available, usage.total_gram);

            for draw in &plan.draws {
                sqlx::query(
                    "UPDATE inventory_items \
                     SET quantity_gram = quantity_gram - $1, updated_at = now() \
                     WHERE id = $2",
                )
                .bind(draw.quantity_gram)
                .bind(draw.item_id)
                .execute(&mut *tx)
                .await?;
            }

            if !plan.is_clean() {
                warnings.push(format!(
                    "{}: kho không đủ (thiếu {} g), đã trừ về 0",
                    usage.ingredient_name, plan.shortfall_gram
                ));
            }
        }

        tx.commit().await?;

        if !warnings.is_empty() {
            tracing::warn!(
                schedule_id = %schedule_id,
                "Weekly settlement completed with warnings: {}",
                warnings.join("; ")
            );
        }

        Ok(SettlementResult {
            schedule_id,
            is_success: true,
            warning: (!warnings.is_empty()).then(|| warnings.join("; ")),
        })
    }

    /// Get a schedule with its meals and recorded usages
    pub async fn get_schedule(&self, schedule_id: Uuid) -> AppResult<ScheduleWithMeals> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM weekly_schedules WHERE id = $1"
        ))
        .bind(schedule_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule".to_string()))?;

        #[derive(sqlx::FromRow)]
        struct MealRow {
            id: Uuid,
            schedule_id: Uuid,
            meal_date: NaiveDate,
            meal_name: String,
        }

        let meals = sqlx::query_as::<_, MealRow>(
            "SELECT id, schedule_id, meal_date, meal_name FROM daily_meals \
             WHERE schedule_id = $1 ORDER BY meal_date",
        )
        .bind(schedule_id)
        .fetch_all(&self.db)
        .await?;

        let usages = sqlx::query_as::<_, UsageRow>(
            "SELECT u.daily_meal_id, u.ingredient_id, u.ingredient_name, u.actual_quantity_used_gram \
             FROM meal_ingredient_usages u \
             JOIN daily_meals m ON m.id = u.daily_meal_id \
             WHERE m.schedule_id = $1 \
             ORDER BY m.meal_date, u.ingredient_name",
        )
        .bind(schedule_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ScheduleWithMeals {
            schedule: row.into(),
            daily_meals: meals
                .into_iter()
                .map(|m| DailyMeal {
                    id: m.id,
                    schedule_id: m.schedule_id,
                    meal_date: m.meal_date,
                    meal_name: m.meal_name,
                })
                .collect(),
            usages: usages.into_iter().map(MealIngredientUsage::from).collect(),
        })
    }

    /// List schedules, most recent week first
    pub async fn list_schedules(&self) -> AppResult<Vec<WeeklySchedule>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM weekly_schedules ORDER BY week_start DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(WeeklySchedule::from).collect())
    }

    async fn fetch_usages(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        schedule_id: Uuid,
    ) -> AppResult<Vec<MealIngredientUsage>> {
        let rows = sqlx::query_as::<_, UsageRow>(
            "SELECT u.daily_meal_id, u.ingredient_id, u.ingredient_name, u.actual_quantity_used_gram \
             FROM meal_ingredient_usages u \
             JOIN daily_meals m ON m.id = u.daily_meal_id \
             WHERE m.schedule_id = $1",
        )
        .bind(schedule_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.into_iter().map(MealIngredientUsage::from).collect())
    }
}
