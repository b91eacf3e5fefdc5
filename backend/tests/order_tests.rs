//! Purchase order tests
//!
//! Tests for plan confirmation and order resolution including:
//! - Snapshot: every plan line yields exactly one order line
//! - Operator overrides on quantity and price
//! - Terminal order states

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{
    derive_line_status, snapshot_order_lines, unpriced_line_count, OrderLineOverride,
    Pagination, PaginationMeta, PlanLine, PurchaseOrderStatus,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn plan_line(ingredient_id: Uuid, name: &str, quantity: &str, price: &str) -> PlanLine {
    let actual_price = dec(price);
    PlanLine {
        id: Uuid::new_v4(),
        plan_id: Uuid::new_v4(),
        ingredient_id,
        ingredient_name: name.to_string(),
        category: None,
        requested_quantity_gram: dec(quantity),
        actual_price,
        status: derive_line_status(actual_price),
        batch_no: String::new(),
        origin: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Without overrides the snapshot copies quantity and price verbatim
    #[test]
    fn test_snapshot_copies_plan_lines() {
        let rice = Uuid::new_v4();
        let pork = Uuid::new_v4();
        let lines = vec![
            plan_line(rice, "Gạo", "1000", "25000"),
            plan_line(pork, "Thịt heo", "500", "120000"),
        ];

        let snapshot = snapshot_order_lines(&lines, &[]);

        assert_eq!(snapshot.len(), 2);
        let rice_line = snapshot.iter().find(|l| l.ingredient_id == rice).unwrap();
        assert_eq!(rice_line.quantity_override_gram, dec("1000"));
        assert_eq!(rice_line.unit_price, dec("25000"));
    }

    /// An override replaces quantity and price for its ingredient only
    #[test]
    fn test_snapshot_applies_override() {
        let rice = Uuid::new_v4();
        let pork = Uuid::new_v4();
        let lines = vec![
            plan_line(rice, "Gạo", "1000", "25000"),
            plan_line(pork, "Thịt heo", "500", "120000"),
        ];
        let overrides = vec![OrderLineOverride {
            ingredient_id: rice,
            quantity_override_gram: Some(dec("800")),
            unit_price: Some(dec("24000")),
            batch_no: None,
            origin: None,
            expiry_date: None,
        }];

        let snapshot = snapshot_order_lines(&lines, &overrides);

        let rice_line = snapshot.iter().find(|l| l.ingredient_id == rice).unwrap();
        assert_eq!(rice_line.quantity_override_gram, dec("800"));
        assert_eq!(rice_line.unit_price, dec("24000"));

        let pork_line = snapshot.iter().find(|l| l.ingredient_id == pork).unwrap();
        assert_eq!(pork_line.quantity_override_gram, dec("500"));
        assert_eq!(pork_line.unit_price, dec("120000"));
    }

    /// Overrides for ingredients not on the plan are ignored
    #[test]
    fn test_snapshot_ignores_unknown_override() {
        let rice = Uuid::new_v4();
        let lines = vec![plan_line(rice, "Gạo", "1000", "25000")];
        let overrides = vec![OrderLineOverride {
            ingredient_id: Uuid::new_v4(),
            quantity_override_gram: Some(dec("999")),
            unit_price: None,
            batch_no: None,
            origin: None,
            expiry_date: None,
        }];

        let snapshot = snapshot_order_lines(&lines, &overrides);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity_override_gram, dec("1000"));
    }

    /// The soft gate counts unpriced lines at confirmation time
    #[test]
    fn test_soft_gate_count() {
        let lines = vec![
            plan_line(Uuid::new_v4(), "Gạo", "1000", "25000"),
            plan_line(Uuid::new_v4(), "Thịt heo", "500", "0"),
        ];

        assert_eq!(unpriced_line_count(&lines), 1);
    }

    /// Confirmed and Rejected are terminal; only Pending can be resolved
    #[test]
    fn test_order_terminal_states() {
        assert!(!PurchaseOrderStatus::Pending.is_terminal());
        assert!(PurchaseOrderStatus::Confirmed.is_terminal());
        assert!(PurchaseOrderStatus::Rejected.is_terminal());

        assert!(PurchaseOrderStatus::Pending.can_resolve());
        assert!(!PurchaseOrderStatus::Confirmed.can_resolve());
        assert!(!PurchaseOrderStatus::Rejected.can_resolve());
    }

    /// Status round-trips through its database representation
    #[test]
    fn test_order_status_parse() {
        for status in [
            PurchaseOrderStatus::Pending,
            PurchaseOrderStatus::Confirmed,
            PurchaseOrderStatus::Rejected,
        ] {
            assert_eq!(PurchaseOrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PurchaseOrderStatus::parse("cancelled"), None);
    }

    /// Order listing pagination clamps bad input and computes offsets
    #[test]
    fn test_pagination_clamping_and_offset() {
        let defaults = Pagination::default();
        assert_eq!(defaults.page(), 1);
        assert_eq!(defaults.per_page(), 20);
        assert_eq!(defaults.offset(), 0);

        let zeroed = Pagination { page: 0, per_page: 0 };
        assert_eq!(zeroed.page(), 1);
        assert_eq!(zeroed.per_page(), 1);

        let oversized = Pagination { page: 3, per_page: 500 };
        assert_eq!(oversized.per_page(), 100);
        assert_eq!(oversized.offset(), 200);
    }

    /// Pagination metadata rounds total pages up
    #[test]
    fn test_pagination_meta_total_pages() {
        let pagination = Pagination { page: 1, per_page: 20 };

        let meta = PaginationMeta::new(&pagination, 41);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_items, 41);

        let empty = PaginationMeta::new(&pagination, 0);
        assert_eq!(empty.total_pages, 0);
    }

    /// End-to-end snapshot scenario from the kitchen portal
    #[test]
    fn test_confirmation_scenario() {
        let rice = Uuid::new_v4();
        let pork = Uuid::new_v4();
        let lines = vec![
            plan_line(rice, "Gạo", "1000", "25000"),
            plan_line(pork, "Thịt heo", "500", "0"),
        ];

        // One unpriced line: the operator must acknowledge before ordering
        assert_eq!(unpriced_line_count(&lines), 1);

        // Acknowledged; the snapshot carries the zero price through
        let snapshot = snapshot_order_lines(&lines, &[]);
        assert_eq!(snapshot.len(), 2);
        let pork_line = snapshot.iter().find(|l| l.ingredient_id == pork).unwrap();
        assert_eq!(pork_line.unit_price, Decimal::ZERO);
        assert_eq!(pork_line.ingredient_name, "Thịt heo");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1u32..1_000_000).prop_map(Decimal::from)
    }

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0u32..10_000_000).prop_map(Decimal::from)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The snapshot always has exactly one order line per plan line
        #[test]
        fn prop_snapshot_line_count(
            specs in prop::collection::vec((quantity_strategy(), price_strategy()), 1..20)
        ) {
            let lines: Vec<PlanLine> = specs
                .iter()
                .enumerate()
                .map(|(i, (qty, price))| {
                    plan_line(Uuid::new_v4(), &format!("ingredient-{}", i), &qty.to_string(), &price.to_string())
                })
                .collect();

            let snapshot = snapshot_order_lines(&lines, &[]);
            prop_assert_eq!(snapshot.len(), lines.len());

            // Order preserved and fields copied
            for (plan, order) in lines.iter().zip(snapshot.iter()) {
                prop_assert_eq!(plan.ingredient_id, order.ingredient_id);
                prop_assert_eq!(plan.requested_quantity_gram, order.quantity_override_gram);
                prop_assert_eq!(plan.actual_price, order.unit_price);
            }
        }

        /// Overrides change only the targeted ingredient
        #[test]
        fn prop_override_is_local(
            qty in quantity_strategy(),
            override_qty in quantity_strategy(),
            other_count in 1usize..10
        ) {
            let target = Uuid::new_v4();
            let mut lines = vec![plan_line(target, "target", &qty.to_string(), "0")];
            for i in 0..other_count {
                lines.push(plan_line(Uuid::new_v4(), &format!("other-{}", i), &qty.to_string(), "0"));
            }

            let overrides = vec![OrderLineOverride {
                ingredient_id: target,
                quantity_override_gram: Some(override_qty),
                unit_price: None,
                batch_no: None,
                origin: None,
                expiry_date: None,
            }];

            let snapshot = snapshot_order_lines(&lines, &overrides);

            for line in &snapshot {
                if line.ingredient_id == target {
                    prop_assert_eq!(line.quantity_override_gram, override_qty);
                } else {
                    prop_assert_eq!(line.quantity_override_gram, qty);
                }
            }
        }
    }
}
