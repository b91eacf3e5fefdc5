//! Purchase plan service: the editable Draft plan for a date
//!
//! All mutations are gated on the plan still being Draft. Once an order has
//! been created from the plan it is Confirmed and frozen; every edit attempt
//! is rejected with an invalid-state error.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    collapse_draft_lines, derive_line_status, validate_price, validate_quantity_gram, DraftLine,
    LineStatus, PlanLine, PlanStatus, PlanWithLines, PurchasePlan,
};

/// Plan service for the kitchen's draft purchase plans
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
}

/// Database row for a purchase plan
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    plan_date: NaiveDate,
    plan_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlanRow {
    fn into_plan(self) -> AppResult<PurchasePlan> {
        let plan_status = PlanStatus::parse(&self.plan_status)
            .ok_or_else(|| AppError::Internal(format!("Unknown plan status: {}", self.plan_status)))?;
        Ok(PurchasePlan {
            id: self.id,
            plan_date: self.plan_date,
            plan_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for a plan line
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: Uuid,
    plan_id: Uuid,
    ingredient_id: Uuid,
    ingredient_name: String,
    category: Option<String>,
    requested_quantity_gram: Decimal,
    actual_price: Decimal,
    status: String,
    batch_no: String,
    origin: Option<String>,
}

impl LineRow {
    fn into_line(self) -> AppResult<PlanLine> {
        let status = LineStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown line status: {}", self.status)))?;
        Ok(PlanLine {
            id: self.id,
            plan_id: self.plan_id,
            ingredient_id: self.ingredient_id,
            ingredient_name: self.ingredient_name,
            category: self.category,
            requested_quantity_gram: self.requested_quantity_gram,
            actual_price: self.actual_price,
            status,
            batch_no: self.batch_no,
            origin: self.origin,
        })
    }
}

/// Input for adding a line to a plan
#[derive(Debug, Deserialize)]
pub struct AddLineInput {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub category: Option<String>,
    pub quantity_gram: Decimal,
    #[serde(default)]
    pub batch_no: String,
    pub origin: Option<String>,
}

/// Input for editing a line; absent fields keep their current value
#[derive(Debug, Deserialize)]
pub struct UpdateLineInput {
    pub actual_price: Option<Decimal>,
    pub batch_no: Option<String>,
    pub origin: Option<String>,
}

/// Input for persisting the client's working copy of the line set
#[derive(Debug, Deserialize)]
pub struct SaveDraftInput {
    pub lines: Vec<DraftLine>,
}

const PLAN_COLUMNS: &str = "id, plan_date, plan_status, created_at, updated_at";
const LINE_COLUMNS: &str = "id, plan_id, ingredient_id, ingredient_name, category, \
                            requested_quantity_gram, actual_price, status, batch_no, origin";

impl PlanService {
    /// Create a new PlanService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the plan for a date together with its lines.
    ///
    /// No plan for the date is a normal outcome (the portal shows an
    /// empty-state create path), so this returns `None` rather than an error.
    pub async fn get_plan_by_date(&self, date: NaiveDate) -> AppResult<Option<PlanWithLines>> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM purchase_plans WHERE plan_date = $1"
        ))
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let plan = row.into_plan()?;
        let lines = self.fetch_lines(plan.id).await?;
        Ok(Some(PlanWithLines { plan, lines }))
    }

    /// Create an empty Draft plan for a date.
    pub async fn create_plan(&self, date: NaiveDate) -> AppResult<PlanWithLines> {
        let existing = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchase_plans WHERE plan_date = $1)",
        )
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        if existing {
            return Err(AppError::DuplicateEntry("plan for this date".to_string()));
        }

        // The existence check above can race a concurrent create; the UNIQUE
        // constraint on plan_date decides, and the loser gets the same error
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            INSERT INTO purchase_plans (plan_date, plan_status)
            VALUES ($1, 'draft')
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::duplicate_on_unique(e, "plan for this date"))?;

        Ok(PlanWithLines {
            plan: row.into_plan()?,
            lines: Vec::new(),
        })
    }

    /// Add a line, merging into an existing line for the same ingredient.
    ///
    /// A duplicate ingredient never creates a second line: its quantity is
    /// summed into the existing one. Price, batch and origin of an existing
    /// line are kept.
    pub async fn add_or_merge_line(&self, plan_id: Uuid, input: AddLineInput) -> AppResult<PlanLine> {
        if let Err(msg) = validate_quantity_gram(input.quantity_gram) {
            return Err(AppError::Validation {
                field: "quantity_gram".to_string(),
                message: msg.to_string(),
                message_vi: "Số lượng phải lớn hơn 0".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        self.lock_draft_plan(&mut tx, plan_id).await?;

        let row = sqlx::query_as::<_, LineRow>(&format!(
            r#"
            INSERT INTO plan_lines (plan_id, ingredient_id, ingredient_name, category,
                                    requested_quantity_gram, actual_price, status, batch_no, origin)
            VALUES ($1, $2, $3, $4, $5, 0, 'pending', $6, $7)
            ON CONFLICT (plan_id, ingredient_id) DO UPDATE
            SET requested_quantity_gram = plan_lines.requested_quantity_gram + EXCLUDED.requested_quantity_gram
            RETURNING {LINE_COLUMNS}
            "#
        ))
        .bind(plan_id)
        .bind(input.ingredient_id)
        .bind(&input.ingredient_name)
        .bind(&input.category)
        .bind(input.quantity_gram)
        .bind(&input.batch_no)
        .bind(&input.origin)
        .fetch_one(&mut *tx)
        .await?;

        self.touch_plan(&mut tx, plan_id).await?;
        tx.commit().await?;

        row.into_line()
    }

    /// Edit a line's price, batch number, or origin.
    ///
    /// The line's status is derived from the resulting price: positive means
    /// Purchased, zero means Pending.
    pub async fn update_line(
        &self,
        plan_id: Uuid,
        line_id: Uuid,
        input: UpdateLineInput,
    ) -> AppResult<PlanLine> {
        let mut tx = self.db.begin().await?;
        self.lock_draft_plan(&mut tx, plan_id).await?;

        let existing = sqlx::query_as::<_, LineRow>(&format!(
            "SELECT {LINE_COLUMNS} FROM plan_lines WHERE id = $1 AND plan_id = $2"
        ))
        .bind(line_id)
        .bind(plan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan line".to_string()))?;

        let actual_price = input.actual_price.unwrap_or(existing.actual_price);
        if let Err(msg) = validate_price(actual_price) {
            return Err(AppError::Validation {
                field: "actual_price".to_string(),
                message: msg.to_string(),
                message_vi: "Giá không được âm".to_string(),
            });
        }

        let status = derive_line_status(actual_price);
        let batch_no = input.batch_no.unwrap_or(existing.batch_no);
        let origin = input.origin.or(existing.origin);

        let row = sqlx::query_as::<_, LineRow>(&format!(
            r#"
            UPDATE plan_lines
            SET actual_price = $1, status = $2, batch_no = $3, origin = $4
            WHERE id = $5
            RETURNING {LINE_COLUMNS}
            "#
        ))
        .bind(actual_price)
        .bind(status.as_str())
        .bind(&batch_no)
        .bind(&origin)
        .bind(line_id)
        .fetch_one(&mut *tx)
        .await?;

        self.touch_plan(&mut tx, plan_id).await?;
        tx.commit().await?;

        row.into_line()
    }

    /// Remove a line from a Draft plan.
    pub async fn remove_line(&self, plan_id: Uuid, line_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.lock_draft_plan(&mut tx, plan_id).await?;

        let result = sqlx::query("DELETE FROM plan_lines WHERE id = $1 AND plan_id = $2")
            .bind(line_id)
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plan line".to_string()));
        }

        self.touch_plan(&mut tx, plan_id).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Persist the client's working copy of the line set.
    ///
    /// Replaces the stored lines with the submitted set (duplicates collapsed
    /// by merge-add) without changing the plan status.
    pub async fn save_draft(&self, plan_id: Uuid, input: SaveDraftInput) -> AppResult<PlanWithLines> {
        for line in &input.lines {
            if validate_quantity_gram(line.requested_quantity_gram).is_err() {
                return Err(AppError::Validation {
                    field: "requested_quantity_gram".to_string(),
                    message: format!("Quantity for {} must be positive", line.ingredient_name),
                    message_vi: format!("Số lượng của {} phải lớn hơn 0", line.ingredient_name),
                });
            }
            if validate_price(line.actual_price).is_err() {
                return Err(AppError::Validation {
                    field: "actual_price".to_string(),
                    message: format!("Price for {} cannot be negative", line.ingredient_name),
                    message_vi: format!("Giá của {} không được âm", line.ingredient_name),
                });
            }
        }

        let lines = collapse_draft_lines(input.lines);

        let mut tx = self.db.begin().await?;
        self.lock_draft_plan(&mut tx, plan_id).await?;

        sqlx::query("DELETE FROM plan_lines WHERE plan_id = $1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(lines.len());
        for line in lines {
            let status = line.status();
            let row = sqlx::query_as::<_, LineRow>(&format!(
                r#"
                INSERT INTO plan_lines (plan_id, ingredient_id, ingredient_name, category,
                                        requested_quantity_gram, actual_price, status, batch_no, origin)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING {LINE_COLUMNS}
                "#
            ))
            .bind(plan_id)
            .bind(line.ingredient_id)
            .bind(&line.ingredient_name)
            .bind(&line.category)
            .bind(line.requested_quantity_gram)
            .bind(line.actual_price)
            .bind(status.as_str())
            .bind(&line.batch_no)
            .bind(&line.origin)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row.into_line()?);
        }

        // Return the touched row so the response carries the new updated_at
        let plan = self.touch_plan(&mut tx, plan_id).await?;
        tx.commit().await?;

        Ok(PlanWithLines { plan, lines: saved })
    }

    /// Hard-delete a Draft plan and its lines.
    pub async fn delete_plan(&self, plan_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.lock_draft_plan(&mut tx, plan_id).await?;

        sqlx::query("DELETE FROM purchase_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Lock the plan row and ensure it is still Draft.
    async fn lock_draft_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan_id: Uuid,
    ) -> AppResult<PurchasePlan> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM purchase_plans WHERE id = $1 FOR UPDATE"
        ))
        .bind(plan_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan".to_string()))?;

        let plan = row.into_plan()?;
        if !plan.plan_status.is_editable() {
            return Err(AppError::InvalidStateTransition(
                "plan is confirmed and can no longer be edited".to_string(),
            ));
        }
        Ok(plan)
    }

    async fn touch_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan_id: Uuid,
    ) -> AppResult<PurchasePlan> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "UPDATE purchase_plans SET updated_at = now() WHERE id = $1 RETURNING {PLAN_COLUMNS}"
        ))
        .bind(plan_id)
        .fetch_one(&mut **tx)
        .await?;

        row.into_plan()
    }

    async fn fetch_lines(&self, plan_id: Uuid) -> AppResult<Vec<PlanLine>> {
        let rows = sqlx::query_as::<_, LineRow>(&format!(
            "SELECT {LINE_COLUMNS} FROM plan_lines WHERE plan_id = $1 ORDER BY ingredient_name"
        ))
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(LineRow::into_line).collect()
    }
}
