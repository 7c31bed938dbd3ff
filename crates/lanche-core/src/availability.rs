//! # Availability Calculator
//!
//! How many units of a product can be produced right now.
//!
//! ```text
//! X-Burger recipe            stock         floor(stock / per unit)
//! ───────────────            ─────         ───────────────────────
//! Pão     × 1        ──►     12 un    ──►  12
//! Carne   × 0.150 kg ──►   1.000 kg   ──►   6   ◄── bottleneck
//! Queijo  × 0.030 kg ──►   0.500 kg   ──►  16
//!                                          ─────
//!                                  min  =   6
//! ```
//!
//! Derived, never stored: every read recomputes from current stock.

use tracing::warn;

use crate::catalog::Catalog;
use crate::quantity::Quantity;
use crate::types::Product;

/// Result of resolving one dish against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Capacity {
    /// Units that can be produced (never negative).
    pub units: Quantity,
    /// Ingredient that limits production, if any line resolved.
    pub bottleneck: Option<String>,
}

/// Maximum producible units of `product`.
///
/// - Ingredient: its own stock, with negative stock reported as 0.
/// - Dish without recipe lines: 0.
/// - Dish: min over recipe lines of `floor(ingredient stock / per-unit qty)`.
///   Lines that do not resolve to an ingredient are skipped with a warning,
///   as the stock mutator skips them; when no line resolves the result is 0.
pub fn max_producible(product: &Product, catalog: &Catalog) -> Quantity {
    capacity(product, catalog).units
}

/// The ingredient id that limits production of `product`.
///
/// `None` for ingredients, for dishes with no resolvable recipe line, and
/// when the catalog is empty.
pub fn bottleneck(product: &Product, catalog: &Catalog) -> Option<String> {
    capacity(product, catalog).bottleneck
}

/// Full capacity resolution; ties keep the first limiting line in recipe order.
pub fn capacity(product: &Product, catalog: &Catalog) -> Capacity {
    if product.is_ingredient() {
        return Capacity {
            units: product.stock.max_zero(),
            bottleneck: None,
        };
    }

    let mut best: Option<(Quantity, &str)> = None;

    for line in &product.recipe {
        let Some(ingredient) = catalog
            .get(&line.ingredient_id)
            .filter(|p| p.is_ingredient())
        else {
            warn!(
                dish = %product.id,
                ingredient = %line.ingredient_id,
                "Recipe line does not resolve to an ingredient, skipping"
            );
            continue;
        };

        let Some(portions) = ingredient.stock.whole_portions(line.quantity) else {
            warn!(
                dish = %product.id,
                ingredient = %line.ingredient_id,
                quantity = %line.quantity,
                "Recipe line has non-positive quantity, skipping line"
            );
            continue;
        };

        match best {
            Some((current, _)) if current <= portions => {}
            _ => best = Some((portions, ingredient.id.as_str())),
        }
    }

    match best {
        Some((units, limiting)) => Capacity {
            units: units.max_zero(),
            bottleneck: Some(limiting.to_string()),
        },
        None => Capacity {
            units: Quantity::zero(),
            bottleneck: None,
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dish, ingredient};

    fn burger_catalog() -> Catalog {
        Catalog::new(vec![
            ingredient("pao", Quantity::from_int(12), Quantity::from_int(5)),
            ingredient("carne", Quantity::from_int(1), Quantity::from_int(2)),
            ingredient("queijo", Quantity::new(5, 1), Quantity::from_int(1)),
            dish(
                "x-burger",
                &[
                    ("pao", Quantity::from_int(1)),
                    ("carne", Quantity::new(150, 3)),
                    ("queijo", Quantity::new(30, 3)),
                ],
            ),
        ])
    }

    #[test]
    fn test_ingredient_availability_is_its_stock() {
        let catalog = burger_catalog();
        let pao = catalog.get("pao").unwrap();
        assert_eq!(max_producible(pao, &catalog), Quantity::from_int(12));
        assert_eq!(bottleneck(pao, &catalog), None);
    }

    #[test]
    fn test_negative_ingredient_stock_reports_zero() {
        let catalog = Catalog::new(vec![ingredient(
            "a",
            Quantity::from_int(-3),
            Quantity::from_int(1),
        )]);
        let a = catalog.get("a").unwrap();
        assert!(max_producible(a, &catalog).is_zero());
    }

    #[test]
    fn test_dish_is_min_floor_over_lines() {
        let catalog = burger_catalog();
        let burger = catalog.get("x-burger").unwrap();

        assert_eq!(max_producible(burger, &catalog), Quantity::from_int(6));
        assert_eq!(bottleneck(burger, &catalog).as_deref(), Some("carne"));
    }

    #[test]
    fn test_empty_recipe_is_zero() {
        let catalog = Catalog::new(vec![dish("agua", &[])]);
        let agua = catalog.get("agua").unwrap();
        assert!(max_producible(agua, &catalog).is_zero());
        assert_eq!(bottleneck(agua, &catalog), None);
    }

    #[test]
    fn test_unknown_ingredient_lines_are_skipped() {
        let catalog = Catalog::new(vec![
            ingredient("a", Quantity::from_int(10), Quantity::from_int(5)),
            dish(
                "d",
                &[("ghost", Quantity::from_int(1)), ("a", Quantity::from_int(3))],
            ),
        ]);
        let d = catalog.get("d").unwrap();
        assert_eq!(max_producible(d, &catalog), Quantity::from_int(3));
    }

    #[test]
    fn test_only_unknown_lines_is_zero() {
        let catalog = Catalog::new(vec![dish("d", &[("ghost", Quantity::from_int(1))])]);
        let d = catalog.get("d").unwrap();
        assert!(max_producible(d, &catalog).is_zero());
    }

    #[test]
    fn test_oversold_ingredient_clamps_dish_to_zero() {
        let catalog = Catalog::new(vec![
            ingredient("a", Quantity::from_int(-2), Quantity::from_int(5)),
            dish("d", &[("a", Quantity::from_int(3))]),
        ]);
        let d = catalog.get("d").unwrap();
        assert!(max_producible(d, &catalog).is_zero());
        assert_eq!(bottleneck(d, &catalog).as_deref(), Some("a"));
    }

    #[test]
    fn test_lines_pointing_at_dishes_are_skipped() {
        // loaded from a hand-edited document: recipe line names another dish
        let catalog = Catalog::new(vec![
            ingredient("a", Quantity::from_int(10), Quantity::from_int(5)),
            dish("other", &[]),
            dish(
                "d",
                &[("other", Quantity::from_int(1)), ("a", Quantity::from_int(3))],
            ),
        ]);
        let d = catalog.get("d").unwrap();

        assert_eq!(max_producible(d, &catalog), Quantity::from_int(3));
        assert_eq!(bottleneck(d, &catalog).as_deref(), Some("a"));

        let plan = crate::stock::StockPlan::for_sale(
            &catalog,
            &[crate::types::LineItem::from_product(d, Quantity::from_int(1))],
        );
        assert!(plan.delta("other").is_zero());
        assert_eq!(plan.delta("a"), Quantity::from_int(-3));
    }
}
