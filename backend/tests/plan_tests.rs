//! Purchase plan tests
//!
//! Tests for plan editing including:
//! - Merge-add: a duplicate ingredient never creates a second line
//! - Line status derivation from the entered price
//! - Plan status editability

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{
    collapse_draft_lines, derive_line_status, merge_draft_line, unpriced_line_count, DraftLine,
    LineStatus, PlanLine, PlanStatus,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn draft(ingredient_id: Uuid, name: &str, quantity: &str) -> DraftLine {
    DraftLine {
        ingredient_id,
        ingredient_name: name.to_string(),
        category: None,
        requested_quantity_gram: dec(quantity),
        actual_price: Decimal::ZERO,
        batch_no: String::new(),
        origin: None,
    }
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

    /// Adding the same ingredient twice sums its quantity into one line
    #[test]
    fn test_merge_add_same_ingredient() {
        let rice = Uuid::new_v4();
        let mut lines = Vec::new();

        merge_draft_line(&mut lines, draft(rice, "Gạo", "1000"));
        merge_draft_line(&mut lines, draft(rice, "Gạo", "500"));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].requested_quantity_gram, dec("1500"));
    }

    /// Different ingredients create separate lines
    #[test]
    fn test_merge_add_different_ingredients() {
        let rice = Uuid::new_v4();
        let pork = Uuid::new_v4();
        let mut lines = Vec::new();

        merge_draft_line(&mut lines, draft(rice, "Gạo", "1000"));
        merge_draft_line(&mut lines, draft(pork, "Thịt heo", "500"));

        assert_eq!(lines.len(), 2);
    }

    /// Merging keeps the existing line's price and batch number
    #[test]
    fn test_merge_keeps_existing_fields() {
        let rice = Uuid::new_v4();
        let mut priced = draft(rice, "Gạo", "1000");
        priced.actual_price = dec("25000");
        priced.batch_no = "L01".to_string();

        let mut lines = vec![priced];
        merge_draft_line(&mut lines, draft(rice, "Gạo", "200"));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].requested_quantity_gram, dec("1200"));
        assert_eq!(lines[0].actual_price, dec("25000"));
        assert_eq!(lines[0].batch_no, "L01");
    }

    /// Collapsing a submitted line set sums duplicates
    #[test]
    fn test_collapse_draft_lines() {
        let rice = Uuid::new_v4();
        let pork = Uuid::new_v4();
        let lines = vec![
            draft(rice, "Gạo", "1000"),
            draft(pork, "Thịt heo", "500"),
            draft(rice, "Gạo", "300"),
        ];

        let collapsed = collapse_draft_lines(lines);

        assert_eq!(collapsed.len(), 2);
        let rice_line = collapsed.iter().find(|l| l.ingredient_id == rice).unwrap();
        assert_eq!(rice_line.requested_quantity_gram, dec("1300"));
    }

    /// A positive price means Purchased, zero means Pending
    #[test]
    fn test_line_status_from_price() {
        assert_eq!(derive_line_status(Decimal::ZERO), LineStatus::Pending);
        assert_eq!(derive_line_status(dec("0.01")), LineStatus::Purchased);
        assert_eq!(derive_line_status(dec("25000")), LineStatus::Purchased);
    }

    /// Clearing the price back to zero reverts the status to Pending
    #[test]
    fn test_line_status_reverts_when_price_cleared() {
        let mut line = draft(Uuid::new_v4(), "Gạo", "1000");
        line.actual_price = dec("25000");
        assert_eq!(line.status(), LineStatus::Purchased);

        line.actual_price = Decimal::ZERO;
        assert_eq!(line.status(), LineStatus::Pending);
    }

    /// Unpriced count feeds the order-confirmation soft gate
    #[test]
    fn test_unpriced_line_count() {
        let lines = vec![
            plan_line(Uuid::new_v4(), "Gạo", "1000", "25000"),
            plan_line(Uuid::new_v4(), "Thịt heo", "500", "0"),
            plan_line(Uuid::new_v4(), "Rau muống", "300", "0"),
        ];

        assert_eq!(unpriced_line_count(&lines), 2);
    }

    /// Only Draft plans are editable
    #[test]
    fn test_plan_editability() {
        assert!(PlanStatus::Draft.is_editable());
        assert!(!PlanStatus::Confirmed.is_editable());
    }

    /// Status round-trips through its database representation
    #[test]
    fn test_plan_status_parse() {
        assert_eq!(PlanStatus::parse("draft"), Some(PlanStatus::Draft));
        assert_eq!(PlanStatus::parse("confirmed"), Some(PlanStatus::Confirmed));
        assert_eq!(PlanStatus::parse("deleted"), None);
        assert_eq!(PlanStatus::parse(PlanStatus::Draft.as_str()), Some(PlanStatus::Draft));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1u32..1_000_000).prop_map(|n| Decimal::from(n))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Merging never changes the total requested quantity
        #[test]
        fn prop_merge_preserves_total_quantity(
            quantities in prop::collection::vec(quantity_strategy(), 1..20),
            ingredient_count in 1usize..5
        ) {
            let ingredients: Vec<Uuid> = (0..ingredient_count).map(|_| Uuid::new_v4()).collect();

            let mut lines = Vec::new();
            let mut expected_total = Decimal::ZERO;
            for (i, qty) in quantities.iter().enumerate() {
                let id = ingredients[i % ingredients.len()];
                expected_total += qty;
                merge_draft_line(&mut lines, DraftLine {
                    ingredient_id: id,
                    ingredient_name: format!("ingredient-{}", i % ingredients.len()),
                    category: None,
                    requested_quantity_gram: *qty,
                    actual_price: Decimal::ZERO,
                    batch_no: String::new(),
                    origin: None,
                });
            }

            let total: Decimal = lines.iter().map(|l| l.requested_quantity_gram).sum();
            prop_assert_eq!(total, expected_total);

            // Never more lines than distinct ingredients
            prop_assert!(lines.len() <= ingredient_count);
        }

        /// Each distinct ingredient appears at most once after merging
        #[test]
        fn prop_merge_yields_unique_ingredients(
            quantities in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let shared_id = Uuid::new_v4();
            let mut lines = Vec::new();
            for qty in &quantities {
                merge_draft_line(&mut lines, DraftLine {
                    ingredient_id: shared_id,
                    ingredient_name: "Gạo".to_string(),
                    category: None,
                    requested_quantity_gram: *qty,
                    actual_price: Decimal::ZERO,
                    batch_no: String::new(),
                    origin: None,
                });
            }

            prop_assert_eq!(lines.len(), 1);
        }

        /// Status derivation is consistent: Purchased iff price is positive
        #[test]
        fn prop_status_matches_price(price in 0u32..10_000_000) {
            let price = Decimal::from(price);
            let status = derive_line_status(price);
            if price > Decimal::ZERO {
                prop_assert_eq!(status, LineStatus::Purchased);
            } else {
                prop_assert_eq!(status, LineStatus::Pending);
            }
        }
    }
}
