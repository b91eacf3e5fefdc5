//! Purchase order models
//!
//! An order is an immutable, supplier-addressed commitment created from a
//! Draft plan. Its lines are snapshot copies of the plan lines at
//! confirmation time, never live references back into the plan.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::PlanLine;

/// Lifecycle status of a purchase order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "pending",
            PurchaseOrderStatus::Confirmed => "confirmed",
            PurchaseOrderStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PurchaseOrderStatus::Pending),
            "confirmed" => Some(PurchaseOrderStatus::Confirmed),
            "rejected" => Some(PurchaseOrderStatus::Rejected),
            _ => None,
        }
    }

    /// Confirmed and Rejected are terminal: no further transition is valid.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PurchaseOrderStatus::Pending)
    }

    /// Whether a manager may still approve or reject the order.
    pub fn can_resolve(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Pending)
    }
}

/// A purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    /// Origin plan, informational only
    pub plan_id: Uuid,
    pub supplier_name: String,
    pub note: Option<String>,
    pub order_date: NaiveDate,
    pub status: PurchaseOrderStatus,
    pub bill_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot copy of a plan line carried on an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    /// The actually-ordered quantity; may differ from the plan's request
    pub quantity_override_gram: Decimal,
    pub unit_price: Decimal,
    pub batch_no: String,
    pub origin: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// An order together with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub lines: Vec<OrderLine>,
}

/// Per-line adjustments the operator may submit when creating an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineOverride {
    pub ingredient_id: Uuid,
    pub quantity_override_gram: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub batch_no: Option<String>,
    pub origin: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// An order line ready for insertion, before it has an identity
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub quantity_override_gram: Decimal,
    pub unit_price: Decimal,
    pub batch_no: String,
    pub origin: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Snapshot a plan's lines into order lines, applying operator overrides.
///
/// Every plan line yields exactly one order line. The requested quantity
/// becomes the ordered quantity and the actual price becomes the unit price
/// unless an override for that ingredient says otherwise. Overrides for
/// ingredients not on the plan are ignored.
pub fn snapshot_order_lines(
    plan_lines: &[PlanLine],
    overrides: &[OrderLineOverride],
) -> Vec<NewOrderLine> {
    plan_lines
        .iter()
        .map(|line| {
            let adjustment = overrides
                .iter()
                .find(|o| o.ingredient_id == line.ingredient_id);
            NewOrderLine {
                ingredient_id: line.ingredient_id,
                ingredient_name: line.ingredient_name.clone(),
                quantity_override_gram: adjustment
                    .and_then(|o| o.quantity_override_gram)
                    .unwrap_or(line.requested_quantity_gram),
                unit_price: adjustment
                    .and_then(|o| o.unit_price)
                    .unwrap_or(line.actual_price),
                batch_no: adjustment
                    .and_then(|o| o.batch_no.clone())
                    .unwrap_or_else(|| line.batch_no.clone()),
                origin: adjustment
                    .and_then(|o| o.origin.clone())
                    .or_else(|| line.origin.clone()),
                expiry_date: adjustment.and_then(|o| o.expiry_date),
            }
        })
        .collect()
}
