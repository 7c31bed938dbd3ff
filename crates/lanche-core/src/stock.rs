//! # Stock Mutator
//!
//! Turns sale and purchase lines into ingredient stock changes.
//!
//! ## Plan, Then Apply
//! ```text
//! ┌──────────────┐   plan_sale()      ┌──────────────┐  check(policy)  ┌──────────┐
//! │ Sale lines   │ ─────────────────► │  StockPlan   │ ──────────────► │ apply()  │
//! │ 2 × X-Burger │  expand recipes    │ pao   -2     │  reject before  │ one pass │
//! │ 1 × Refri    │  skip unknown ids  │ carne -0.300 │  any mutation   │ infallible│
//! └──────────────┘                    │ refri -1     │                 └──────────┘
//!                                     └──────────────┘
//! ```
//!
//! Computing the full delta map first means a sale either changes every
//! affected ingredient or none of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::quantity::Quantity;
use crate::types::LineItem;

/// What to do when a sale would drive an ingredient below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Record the sale anyway; stock goes negative (oversold).
    AllowNegative,
    /// Refuse the sale with `CoreError::InsufficientStock`.
    RejectNegative,
}

impl Default for StockPolicy {
    fn default() -> Self {
        StockPolicy::AllowNegative
    }
}

/// Net stock change per ingredient id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockPlan {
    deltas: BTreeMap<String, Quantity>,
}

impl StockPlan {
    /// Purchase lines raise ingredient stock by the purchased quantity.
    ///
    /// Dish lines and unknown ids are skipped with a warning.
    pub fn for_purchase(catalog: &Catalog, items: &[LineItem]) -> Self {
        let mut plan = StockPlan::default();

        for item in items {
            match catalog.get(&item.product_id) {
                Some(product) if product.is_ingredient() => {
                    plan.add(&product.id, item.quantity);
                }
                Some(product) => {
                    warn!(product = %product.id, "Purchase line for a dish, skipping");
                }
                None => {
                    warn!(product = %item.product_id, "Purchase line for unknown product, skipping");
                }
            }
        }

        plan
    }

    /// Sale lines consume stock.
    ///
    /// - Dish: each recipe ingredient decreases by `recipe qty × sold qty`
    /// - Ingredient: its own stock decreases by the sold qty
    /// - Unknown ids (line or recipe) are skipped with a warning
    pub fn for_sale(catalog: &Catalog, items: &[LineItem]) -> Self {
        let mut plan = StockPlan::default();

        for item in items {
            let Some(product) = catalog.get(&item.product_id) else {
                warn!(product = %item.product_id, "Sale line for unknown product, skipping");
                continue;
            };

            if product.is_ingredient() {
                plan.add(&product.id, -item.quantity);
                continue;
            }

            for line in &product.recipe {
                match catalog.get(&line.ingredient_id) {
                    Some(ingredient) if ingredient.is_ingredient() => {
                        plan.add(&ingredient.id, -(line.quantity * item.quantity));
                    }
                    _ => {
                        warn!(
                            dish = %product.id,
                            ingredient = %line.ingredient_id,
                            "Recipe line does not resolve to an ingredient, skipping"
                        );
                    }
                }
            }
        }

        plan
    }

    fn add(&mut self, id: &str, delta: Quantity) {
        *self.deltas.entry(id.to_string()).or_default() += delta;
    }

    /// Net change planned for `id` (zero when untouched).
    pub fn delta(&self, id: &str) -> Quantity {
        self.deltas.get(id).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Quantity)> {
        self.deltas.iter().map(|(id, q)| (id.as_str(), *q))
    }

    /// Verifies the plan against `policy` without touching the catalog.
    pub fn check(&self, catalog: &Catalog, policy: StockPolicy) -> CoreResult<()> {
        if policy == StockPolicy::AllowNegative {
            return Ok(());
        }

        for (id, delta) in self.iter() {
            if !delta.is_negative() {
                continue;
            }
            let Some(product) = catalog.get(id) else {
                continue;
            };
            if (product.stock + delta).is_negative() {
                return Err(CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock,
                    required: -delta,
                });
            }
        }

        Ok(())
    }

    /// Applies every delta in one pass. Ids that vanished are ignored.
    pub fn apply(&self, catalog: &mut Catalog) {
        for (id, delta) in self.iter() {
            if let Some(product) = catalog.get_mut(id) {
                product.stock += delta;
                debug!(product = %id, delta = %delta, stock = %product.stock, "Stock adjusted");
            }
        }
    }
}

/// Raises ingredient stock for every purchase line.
pub fn apply_purchase(catalog: &mut Catalog, items: &[LineItem]) {
    StockPlan::for_purchase(catalog, items).apply(catalog);
}

/// Deducts stock for every sale line, honouring `policy`.
///
/// On error nothing was changed.
pub fn apply_sale_deduction(
    catalog: &mut Catalog,
    items: &[LineItem],
    policy: StockPolicy,
) -> CoreResult<()> {
    let plan = StockPlan::for_sale(catalog, items);
    plan.check(catalog, policy)?;
    plan.apply(catalog);
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::testing::{dish, ingredient};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            ingredient("pao", Quantity::from_int(10), Quantity::from_int(5)),
            ingredient("carne", Quantity::from_int(1), Quantity::from_int(1)),
            ingredient("refri", Quantity::from_int(6), Quantity::from_int(2)),
            dish(
                "x",
                &[("pao", Quantity::from_int(1)), ("carne", Quantity::new(150, 3))],
            ),
        ])
    }

    fn line(id: &str, qty: Quantity) -> LineItem {
        LineItem::new(id, id, qty, Money::from_cents(100))
    }

    #[test]
    fn test_sale_of_dish_deducts_recipe_only() {
        let mut catalog = catalog();
        apply_sale_deduction(
            &mut catalog,
            &[line("x", Quantity::from_int(2))],
            StockPolicy::AllowNegative,
        )
        .unwrap();

        assert_eq!(catalog.get("pao").unwrap().stock, Quantity::from_int(8));
        assert_eq!(catalog.get("carne").unwrap().stock, Quantity::new(700, 3));
        assert_eq!(catalog.get("refri").unwrap().stock, Quantity::from_int(6));
        assert!(catalog.get("x").unwrap().stock.is_zero());
    }

    #[test]
    fn test_sale_of_ingredient_deducts_itself() {
        let mut catalog = catalog();
        apply_sale_deduction(
            &mut catalog,
            &[line("refri", Quantity::from_int(2))],
            StockPolicy::AllowNegative,
        )
        .unwrap();
        assert_eq!(catalog.get("refri").unwrap().stock, Quantity::from_int(4));
    }

    #[test]
    fn test_oversell_allowed_by_default() {
        let mut catalog = catalog();
        apply_sale_deduction(
            &mut catalog,
            &[line("x", Quantity::from_int(10))],
            StockPolicy::default(),
        )
        .unwrap();
        assert_eq!(catalog.get("carne").unwrap().stock, Quantity::new(-500, 3));
    }

    #[test]
    fn test_reject_negative_leaves_catalog_untouched() {
        let mut catalog = catalog();
        let before = catalog.clone();

        let err = apply_sale_deduction(
            &mut catalog,
            &[line("refri", Quantity::from_int(1)), line("x", Quantity::from_int(10))],
            StockPolicy::RejectNegative,
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_deltas_accumulate_across_lines() {
        let catalog = catalog();
        let plan = StockPlan::for_sale(
            &catalog,
            &[line("x", Quantity::from_int(1)), line("pao", Quantity::from_int(2))],
        );
        assert_eq!(plan.delta("pao"), Quantity::from_int(-3));
        assert_eq!(plan.delta("refri"), Quantity::zero());
    }

    #[test]
    fn test_purchase_raises_ingredients_and_skips_others() {
        let mut catalog = catalog();
        apply_purchase(
            &mut catalog,
            &[
                line("pao", Quantity::from_int(20)),
                line("x", Quantity::from_int(5)),
                line("ghost", Quantity::from_int(5)),
            ],
        );
        assert_eq!(catalog.get("pao").unwrap().stock, Quantity::from_int(30));
        assert!(catalog.get("x").unwrap().stock.is_zero());
    }

    #[test]
    fn test_unknown_sale_line_is_skipped() {
        let catalog = catalog();
        let plan = StockPlan::for_sale(&catalog, &[line("ghost", Quantity::from_int(1))]);
        assert!(plan.is_empty());
    }
}
