//! Purchase plan models
//!
//! A purchase plan is the mutable, date-scoped draft list of ingredients a
//! kitchen intends to buy. Lines are editable only while the plan is Draft;
//! creating an order from the plan freezes it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a purchase plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Confirmed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PlanStatus::Draft),
            "confirmed" => Some(PlanStatus::Confirmed),
            _ => None,
        }
    }

    /// Lines may be added, edited, or removed only while the plan is Draft.
    pub fn is_editable(&self) -> bool {
        matches!(self, PlanStatus::Draft)
    }
}

/// Purchase state of a single plan line, derived from its actual price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Pending,
    Purchased,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Pending => "pending",
            LineStatus::Purchased => "purchased",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LineStatus::Pending),
            "purchased" => Some(LineStatus::Purchased),
            _ => None,
        }
    }
}

/// A line is Purchased exactly when a positive actual price has been entered.
pub fn derive_line_status(actual_price: Decimal) -> LineStatus {
    if actual_price > Decimal::ZERO {
        LineStatus::Purchased
    } else {
        LineStatus::Pending
    }
}

/// A purchase plan for a single date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasePlan {
    pub id: Uuid,
    pub plan_date: NaiveDate,
    pub plan_status: PlanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single ingredient entry within a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanLine {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub category: Option<String>,
    pub requested_quantity_gram: Decimal,
    /// Operator-entered price in VND; zero until purchased
    pub actual_price: Decimal,
    pub status: LineStatus,
    pub batch_no: String,
    pub origin: Option<String>,
}

/// A plan together with its lines, as served to the kitchen portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanWithLines {
    #[serde(flatten)]
    pub plan: PurchasePlan,
    pub lines: Vec<PlanLine>,
}

/// Client-held working copy of a plan line, before persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftLine {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub category: Option<String>,
    pub requested_quantity_gram: Decimal,
    #[serde(default)]
    pub actual_price: Decimal,
    #[serde(default)]
    pub batch_no: String,
    pub origin: Option<String>,
}

impl DraftLine {
    /// Derived purchase state of this working line.
    pub fn status(&self) -> LineStatus {
        derive_line_status(self.actual_price)
    }
}

/// Merge a new line into a working line set.
///
/// A duplicate ingredient does not create a second line: its quantity is
/// summed into the existing line. Other fields of the existing line are kept.
pub fn merge_draft_line(lines: &mut Vec<DraftLine>, incoming: DraftLine) {
    match lines
        .iter_mut()
        .find(|l| l.ingredient_id == incoming.ingredient_id)
    {
        Some(existing) => {
            existing.requested_quantity_gram += incoming.requested_quantity_gram;
        }
        None => lines.push(incoming),
    }
}

/// Collapse duplicate ingredients in a submitted line set, summing quantities.
/// The first occurrence wins for all non-quantity fields.
pub fn collapse_draft_lines(lines: Vec<DraftLine>) -> Vec<DraftLine> {
    let mut collapsed: Vec<DraftLine> = Vec::with_capacity(lines.len());
    for line in lines {
        merge_draft_line(&mut collapsed, line);
    }
    collapsed
}

/// Number of lines with no price entered yet.
///
/// Used by the order-confirmation soft gate: the operator is asked to
/// acknowledge unpriced lines before the order is created.
pub fn unpriced_line_count(lines: &[PlanLine]) -> usize {
    lines
        .iter()
        .filter(|l| l.actual_price <= Decimal::ZERO)
        .count()
}
