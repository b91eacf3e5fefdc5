//! Purchase order service: plan confirmation, approval, and rejection
//!
//! Creating an order from a Draft plan and flipping the plan to Confirmed is
//! one transaction; there is no end state where one exists without the other.
//! Approval and rejection are guarded status updates so that only the first
//! resolution of a concurrent pair wins.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    snapshot_order_lines, unpriced_line_count, validate_quantity_gram, validate_supplier_name,
    LineStatus, OrderLine, OrderLineOverride, OrderWithLines, PaginatedResponse, Pagination,
    PaginationMeta, PlanLine, PlanStatus, PurchaseOrder, PurchaseOrderStatus,
};

/// Order service for the purchasing workflow
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Database row for a purchase order
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    plan_id: Uuid,
    supplier_name: String,
    note: Option<String>,
    order_date: NaiveDate,
    status: String,
    bill_image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> AppResult<PurchaseOrder> {
        let status = PurchaseOrderStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown order status: {}", self.status)))?;
        Ok(PurchaseOrder {
            id: self.id,
            plan_id: self.plan_id,
            supplier_name: self.supplier_name,
            note: self.note,
            order_date: self.order_date,
            status,
            bill_image_url: self.bill_image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for an order line
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: Uuid,
    order_id: Uuid,
    ingredient_id: Uuid,
    ingredient_name: String,
    quantity_override_gram: Decimal,
    unit_price: Decimal,
    batch_no: String,
    origin: Option<String>,
    expiry_date: Option<NaiveDate>,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        OrderLine {
            id: row.id,
            order_id: row.order_id,
            ingredient_id: row.ingredient_id,
            ingredient_name: row.ingredient_name,
            quantity_override_gram: row.quantity_override_gram,
            unit_price: row.unit_price,
            batch_no: row.batch_no,
            origin: row.origin,
            expiry_date: row.expiry_date,
        }
    }
}

/// Input for creating an order from a Draft plan
#[derive(Debug, Deserialize)]
pub struct ConfirmPlanInput {
    pub plan_id: Uuid,
    pub supplier_name: String,
    pub note: Option<String>,
    /// Operator acknowledgement that unpriced lines may proceed
    #[serde(default)]
    pub acknowledge_unpriced: bool,
    /// Optional per-line adjustments (quantity, price, batch, expiry)
    #[serde(default)]
    pub lines: Vec<OrderLineOverride>,
}

const ORDER_COLUMNS: &str =
    "id, plan_id, supplier_name, note, order_date, status, bill_image_url, created_at, updated_at";
const ORDER_LINE_COLUMNS: &str = "id, order_id, ingredient_id, ingredient_name, \
                                  quantity_override_gram, unit_price, batch_no, origin, expiry_date";

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a purchase order from a Draft plan and freeze the plan.
    ///
    /// Unpriced lines are a soft gate: without the operator's acknowledgement
    /// the call fails with the unpriced count so the portal can prompt, and
    /// the resubmission with `acknowledge_unpriced` proceeds.
    pub async fn confirm_plan_to_order(
        &self,
        input: ConfirmPlanInput,
        bill_image_url: Option<String>,
    ) -> AppResult<OrderWithLines> {
        if let Err(msg) = validate_supplier_name(&input.supplier_name) {
            return Err(AppError::Validation {
                field: "supplier_name".to_string(),
                message: msg.to_string(),
                message_vi: "Tên nhà cung cấp không hợp lệ".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        // Lock the plan; only Draft plans can be confirmed
        let plan_status = sqlx::query_scalar::<_, String>(
            "SELECT plan_status FROM purchase_plans WHERE id = $1 FOR UPDATE",
        )
        .bind(input.plan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan".to_string()))?;

        if PlanStatus::parse(&plan_status) != Some(PlanStatus::Draft) {
            return Err(AppError::InvalidStateTransition(
                "plan is already confirmed".to_string(),
            ));
        }

        let plan_lines = self.fetch_plan_lines(&mut tx, input.plan_id).await?;
        if plan_lines.is_empty() {
            return Err(AppError::Validation {
                field: "lines".to_string(),
                message: "Plan has no lines to order".to_string(),
                message_vi: "Kế hoạch chưa có mặt hàng nào".to_string(),
            });
        }

        let unpriced = unpriced_line_count(&plan_lines);
        if unpriced > 0 && !input.acknowledge_unpriced {
            return Err(AppError::UnpricedLines(unpriced));
        }

        let new_lines = snapshot_order_lines(&plan_lines, &input.lines);
        for line in &new_lines {
            if validate_quantity_gram(line.quantity_override_gram).is_err() {
                return Err(AppError::Validation {
                    field: "quantity_override_gram".to_string(),
                    message: format!("Ordered quantity for {} must be positive", line.ingredient_name),
                    message_vi: format!("Số lượng đặt của {} phải lớn hơn 0", line.ingredient_name),
                });
            }
        }

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO purchase_orders (plan_id, supplier_name, note, order_date, status, bill_image_url)
            VALUES ($1, $2, $3, CURRENT_DATE, 'pending', $4)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(input.plan_id)
        .bind(input.supplier_name.trim())
        .bind(&input.note)
        .bind(&bill_image_url)
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(new_lines.len());
        for line in new_lines {
            let row = sqlx::query_as::<_, OrderLineRow>(&format!(
                r#"
                INSERT INTO order_lines (order_id, ingredient_id, ingredient_name,
                                         quantity_override_gram, unit_price, batch_no, origin, expiry_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING {ORDER_LINE_COLUMNS}
                "#
            ))
            .bind(order_row.id)
            .bind(line.ingredient_id)
            .bind(&line.ingredient_name)
            .bind(line.quantity_override_gram)
            .bind(line.unit_price)
            .bind(&line.batch_no)
            .bind(&line.origin)
            .bind(line.expiry_date)
            .fetch_one(&mut *tx)
            .await?;
            lines.push(OrderLine::from(row));
        }

        // Flip the plan in the same transaction; the row is locked above so
        // the guard can only fail if the lock was lost, which aborts anyway
        let flipped = sqlx::query(
            "UPDATE purchase_plans SET plan_status = 'confirmed', updated_at = now() \
             WHERE id = $1 AND plan_status = 'draft'",
        )
        .bind(input.plan_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            return Err(AppError::InvalidStateTransition(
                "plan is already confirmed".to_string(),
            ));
        }

        tx.commit().await?;

        Ok(OrderWithLines {
            order: order_row.into_order()?,
            lines,
        })
    }

    /// Approve a Pending order and stock its lines into inventory.
    ///
    /// The status update is guarded: a concurrent approval or rejection of
    /// the same order loses the guard and sees an invalid-state error.
    pub async fn approve_order(&self, order_id: Uuid) -> AppResult<OrderWithLines> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE purchase_orders
            SET status = 'confirmed', updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(self.resolve_conflict(order_id).await?);
        };

        let lines = self.fetch_order_lines(&mut tx, order_id).await?;

        // Stock in: one upsert per line, merging into an existing batch
        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO inventory_items (ingredient_id, ingredient_name, quantity_gram,
                                             expiration_date, batch_no, origin)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (ingredient_id, batch_no) DO UPDATE
                SET quantity_gram = inventory_items.quantity_gram + EXCLUDED.quantity_gram,
                    expiration_date = COALESCE(EXCLUDED.expiration_date, inventory_items.expiration_date),
                    updated_at = now()
                "#,
            )
            .bind(line.ingredient_id)
            .bind(&line.ingredient_name)
            .bind(line.quantity_override_gram)
            .bind(line.expiry_date)
            .bind(&line.batch_no)
            .bind(&line.origin)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderWithLines {
            order: row.into_order()?,
            lines,
        })
    }

    /// Reject a Pending order. No inventory effect; terminal.
    pub async fn reject_order(&self, order_id: Uuid) -> AppResult<OrderWithLines> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE purchase_orders
            SET status = 'rejected', updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(self.resolve_conflict(order_id).await?);
        };

        let lines = self.fetch_order_lines(&mut tx, order_id).await?;
        tx.commit().await?;

        Ok(OrderWithLines {
            order: row.into_order()?,
            lines,
        })
    }

    /// Get an order with its lines
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderWithLines> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let lines = sqlx::query_as::<_, OrderLineRow>(&format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = $1 ORDER BY ingredient_name"
        ))
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderWithLines {
            order: row.into_order()?,
            lines: lines.into_iter().map(OrderLine::from).collect(),
        })
    }

    /// List orders newest first, one page at a time
    pub async fn list_orders(
        &self,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<PurchaseOrder>> {
        let total_items = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchase_orders")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders \
             ORDER BY order_date DESC, created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.per_page() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(OrderRow::into_order)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Build the error for a failed guarded resolution: either the order does
    /// not exist or it has already been resolved.
    async fn resolve_conflict(&self, order_id: Uuid) -> Result<AppError, sqlx::Error> {
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM purchase_orders WHERE id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(match status {
            None => AppError::NotFound("Order".to_string()),
            Some(status) => {
                AppError::InvalidStateTransition(format!("order is already {}", status))
            }
        })
    }

    async fn fetch_plan_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan_id: Uuid,
    ) -> AppResult<Vec<PlanLine>> {
        #[derive(sqlx::FromRow)]
        struct Row {
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

        let rows = sqlx::query_as::<_, Row>(
            "SELECT id, plan_id, ingredient_id, ingredient_name, category, \
                    requested_quantity_gram, actual_price, status, batch_no, origin \
             FROM plan_lines WHERE plan_id = $1 ORDER BY ingredient_name",
        )
        .bind(plan_id)
        .fetch_all(&mut **tx)
        .await?;

        rows.into_iter()
            .map(|row| {
                let status = LineStatus::parse(&row.status).ok_or_else(|| {
                    AppError::Internal(format!("Unknown line status: {}", row.status))
                })?;
                Ok(PlanLine {
                    id: row.id,
                    plan_id: row.plan_id,
                    ingredient_id: row.ingredient_id,
                    ingredient_name: row.ingredient_name,
                    category: row.category,
                    requested_quantity_gram: row.requested_quantity_gram,
                    actual_price: row.actual_price,
                    status,
                    batch_no: row.batch_no,
                    origin: row.origin,
                })
            })
            .collect()
    }

    async fn fetch_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_id: Uuid,
    ) -> AppResult<Vec<OrderLine>> {
        let rows = sqlx::query_as::<_, OrderLineRow>(&format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = $1 ORDER BY ingredient_name"
        ))
        .bind(order_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.into_iter().map(OrderLine::from).collect())
    }
}
