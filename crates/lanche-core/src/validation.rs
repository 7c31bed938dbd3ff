//! # Validation Module
//!
//! Input validation utilities for Lanche POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation                                                  │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Terminal command                                             │
//! │  ├── Permission gate                                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Core operation                                               │
//! │  └── THIS MODULE: runs before any state is touched                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lanche_core::quantity::Quantity;
//! use lanche_core::validation::{validate_discount_percent, validate_quantity};
//!
//! assert!(validate_quantity(Quantity::new(5, 1)).is_ok());
//! assert!(validate_discount_percent(101).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::LineItem;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_STOCK_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Trims `value` and checks it is non-empty and at most `max` characters.
///
/// Returns the trimmed string.
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional free-text field; blank becomes `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use lanche_core::validation::validate_product_name;
///
/// assert!(validate_product_name("X-Salada").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_text("name", name, 200)
}

/// Validates the name a comanda is opened under ("Mesa 1", "João").
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    validate_text("customer name", name, 100)
}

/// Validates an optional email. Empty strings count as "no email".
pub fn validate_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };

    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(Some(email.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale or comanda line quantity.
///
/// ## Rules
/// - Must be positive (> 0); fractions are fine (0.350 kg)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    validate_bounded_quantity(qty, MAX_ITEM_QUANTITY)
}

/// Validates a purchase or shopping-list quantity.
///
/// Same rules as [`validate_quantity`] with MAX_STOCK_QUANTITY as the cap,
/// since ingredients are counted in g and ml.
pub fn validate_stock_quantity(qty: Quantity) -> ValidationResult<()> {
    validate_bounded_quantity(qty, MAX_STOCK_QUANTITY)
}

fn validate_bounded_quantity(qty: Quantity, max: i64) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > Quantity::from_int(max) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

/// Validates a stock level or threshold entered on a catalog write.
pub fn validate_stock_level(field: &str, qty: Quantity) -> ValidationResult<()> {
    if qty.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price or cost.
///
/// ## Example
/// ```rust
/// use lanche_core::money::Money;
/// use lanche_core::validation::validate_price;
///
/// assert!(validate_price("price", Money::from_cents(1099)).is_ok());
/// assert!(validate_price("price", Money::zero()).is_ok());
/// assert!(validate_price("price", Money::from_cents(-100)).is_err());
/// assert!(validate_price("price", Money::from_cents(i64::MAX)).is_err());
/// ```
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    if amount.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a whole-number discount percentage.
pub fn validate_discount_percent(percent: u32) -> ValidationResult<()> {
    if percent > 100 {
        return Err(ValidationError::OutOfRange {
            field: "discount percent".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates redeemed loyalty points.
pub fn validate_points_used(points: i64) -> ValidationResult<()> {
    if points < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "loyalty points used".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the lines of a sale.
///
/// ## Rules
/// - At least one line
/// - No more than MAX_CART_ITEMS (100) lines
/// - Every quantity passes [`validate_quantity`]
/// - Every unit price passes [`validate_price`]
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    require_lines(items)?;
    validate_lines(items, validate_quantity)
}

/// Validates the lines of a purchase: as [`validate_line_items`], with
/// quantities checked by [`validate_stock_quantity`].
pub fn validate_purchase_items(items: &[LineItem]) -> ValidationResult<()> {
    require_lines(items)?;
    validate_lines(items, validate_stock_quantity)
}

/// Validates the items of an open comanda. An empty tab is allowed.
pub fn validate_comanda_items(items: &[LineItem]) -> ValidationResult<()> {
    validate_lines(items, validate_quantity)
}

fn require_lines(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }
    Ok(())
}

fn validate_lines(
    items: &[LineItem],
    check_quantity: fn(Quantity) -> ValidationResult<()>,
) -> ValidationResult<()> {
    if items.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    for item in items {
        check_quantity(item.quantity)?;
        validate_price("unit price", item.unit_price)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text_trims() {
        assert_eq!(validate_customer_name("  Mesa 1 ").unwrap(), "Mesa 1");
        assert!(validate_customer_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(None).unwrap(), None);
        assert_eq!(validate_email(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_email(Some("ana@lanche.com.br")).unwrap().as_deref(),
            Some("ana@lanche.com.br")
        );
        assert!(validate_email(Some("ana.lanche.com")).is_err());
        assert!(validate_email(Some("@lanche.com")).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Quantity::from_int(1)).is_ok());
        assert!(validate_quantity(Quantity::new(150, 3)).is_ok());
        assert!(validate_quantity(Quantity::from_int(999)).is_ok());

        assert!(validate_quantity(Quantity::zero()).is_err());
        assert!(validate_quantity(Quantity::from_int(-1)).is_err());
        assert!(validate_quantity(Quantity::from_int(1000)).is_err());
    }

    #[test]
    fn test_validate_discount_and_points() {
        assert!(validate_discount_percent(0).is_ok());
        assert!(validate_discount_percent(100).is_ok());
        assert!(validate_discount_percent(101).is_err());

        assert!(validate_points_used(0).is_ok());
        assert!(validate_points_used(-5).is_err());
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[]).is_err());

        let ok = LineItem::new("x", "X", Quantity::from_int(2), Money::from_cents(100));
        assert!(validate_line_items(&[ok.clone()]).is_ok());

        let mut free = ok.clone();
        free.unit_price = Money::zero();
        assert!(validate_line_items(&[free]).is_ok());

        let mut negative = ok.clone();
        negative.unit_price = Money::from_cents(-1);
        assert!(validate_line_items(&[negative]).is_err());

        let mut overpriced = ok.clone();
        overpriced.unit_price = Money::from_cents(i64::MAX / 2 + 1);
        assert!(matches!(
            validate_line_items(&[overpriced]),
            Err(ValidationError::OutOfRange { max: MAX_UNIT_PRICE_CENTS, .. })
        ));

        let too_many = vec![ok; MAX_CART_ITEMS + 1];
        assert!(validate_line_items(&too_many).is_err());
    }

    #[test]
    fn test_purchase_lines_allow_gram_quantities() {
        let flour = LineItem::new("f", "Farinha", Quantity::from_int(5000), Money::from_cents(1));
        assert!(validate_line_items(&[flour.clone()]).is_err());
        assert!(validate_purchase_items(&[flour.clone()]).is_ok());

        let mut silly = flour;
        silly.quantity = Quantity::from_int(MAX_STOCK_QUANTITY + 1);
        assert!(validate_purchase_items(&[silly]).is_err());
        assert!(validate_purchase_items(&[]).is_err());
    }

    #[test]
    fn test_comanda_items_may_be_empty() {
        assert!(validate_comanda_items(&[]).is_ok());

        let zero = LineItem::new("x", "X", Quantity::zero(), Money::from_cents(100));
        assert!(validate_comanda_items(&[zero]).is_err());
    }
}
