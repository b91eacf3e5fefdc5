//! Validation utilities for the School Meal Management Platform

use rust_decimal::Decimal;

/// Validate an ingredient quantity in grams (strictly positive)
pub fn validate_quantity_gram(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a price in VND (zero means not yet purchased)
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a supplier name (non-blank, bounded)
pub fn validate_supplier_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Supplier name is required");
    }
    if trimmed.chars().count() > 200 {
        return Err("Supplier name must be at most 200 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity_gram() {
        assert!(validate_quantity_gram(Decimal::from(500)).is_ok());
        assert!(validate_quantity_gram(Decimal::new(1, 1)).is_ok()); // 0.1 g
        assert!(validate_quantity_gram(Decimal::ZERO).is_err());
        assert!(validate_quantity_gram(Decimal::from(-100)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::from(50_000)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_supplier_name() {
        assert!(validate_supplier_name("Công ty ABC").is_ok());
        assert!(validate_supplier_name("   ").is_err());
        assert!(validate_supplier_name("").is_err());
        let long = "a".repeat(201);
        assert!(validate_supplier_name(&long).is_err());
    }
}
