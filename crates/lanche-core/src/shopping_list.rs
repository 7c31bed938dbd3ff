//! # Shopping List
//!
//! Ingredients to buy, accumulated by hand or suggested from low stock, then
//! turned into a purchase.
//!
//! ## Auto-Fill Rule
//! ```text
//! for each ingredient with stock ≤ min_stock and no list entry:
//!     suggested = min(min_stock × 2 − stock, MAX_STOCK_QUANTITY)
//!     add when suggested > 0
//! ```
//! Existing entries are never modified, so auto-fill is idempotent.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::purchase::PurchaseRequest;
use crate::quantity::Quantity;
use crate::state::AppState;
use crate::types::{LineItem, Purchase, ShoppingListItem};
use crate::validation::validate_stock_quantity;
use crate::MAX_STOCK_QUANTITY;

/// Name used on purchase lines whose product has left the catalog.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

impl AppState {
    /// Adds `quantity` of an ingredient, accumulating onto an existing entry.
    ///
    /// The accumulated quantity must stay within `MAX_STOCK_QUANTITY` so the
    /// entry can still be bought.
    pub fn add_to_shopping_list(
        &mut self,
        product_id: &str,
        quantity: Quantity,
    ) -> CoreResult<ShoppingListItem> {
        validate_stock_quantity(quantity)?;

        let product = self
            .products
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        if !product.is_ingredient() {
            return Err(CoreError::NotAnIngredient(product.name.clone()));
        }

        if let Some(entry) = self
            .shopping_list
            .iter_mut()
            .find(|e| e.product_id == product_id)
        {
            validate_stock_quantity(entry.quantity + quantity)?;
            entry.quantity += quantity;
            debug!(product = %product_id, quantity = %entry.quantity, "Shopping list entry increased");
            return Ok(entry.clone());
        }

        let entry = ShoppingListItem {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            quantity,
        };
        self.shopping_list.push(entry.clone());
        debug!(product = %product_id, quantity = %quantity, "Shopping list entry added");
        Ok(entry)
    }

    /// Adds a suggestion for every low-stock ingredient not yet listed.
    ///
    /// Returns how many entries were added.
    pub fn auto_fill_low_stock(&mut self) -> usize {
        let suggestions: Vec<ShoppingListItem> = self
            .products
            .ingredients()
            .filter(|p| p.stock <= p.min_stock)
            .filter(|p| !self.shopping_list.iter().any(|e| e.product_id == p.id))
            .filter_map(|p| {
                let suggested = (p.min_stock + p.min_stock - p.stock)
                    .min(Quantity::from_int(MAX_STOCK_QUANTITY));
                suggested.is_positive().then(|| ShoppingListItem {
                    id: Uuid::new_v4().to_string(),
                    product_id: p.id.clone(),
                    quantity: suggested,
                })
            })
            .collect();

        let added = suggestions.len();
        self.shopping_list.extend(suggestions);

        info!(added, "Shopping list auto-filled from low stock");
        added
    }

    /// Removes the given entries. Returns how many were removed.
    pub fn remove_from_shopping_list(&mut self, ids: &[String]) -> usize {
        let before = self.shopping_list.len();
        self.shopping_list.retain(|e| !ids.contains(&e.id));
        before - self.shopping_list.len()
    }

    /// Buys the selected entries from `supplier_id` at current cost.
    ///
    /// Records the purchase (raising stock) and drops the selected entries
    /// as one step. The list is untouched on error.
    pub fn process_shopping_list_to_purchase(
        &mut self,
        selected_ids: &[String],
        supplier_id: &str,
    ) -> CoreResult<Purchase> {
        if selected_ids.is_empty() {
            return Err(ValidationError::Required {
                field: "selected items".to_string(),
            }
            .into());
        }
        if let Some(missing) = selected_ids
            .iter()
            .find(|id| !self.shopping_list.iter().any(|e| &e.id == *id))
        {
            return Err(CoreError::ShoppingListItemNotFound(missing.clone()));
        }

        let items: Vec<LineItem> = self
            .shopping_list
            .iter()
            .filter(|e| selected_ids.contains(&e.id))
            .map(|e| match self.products.get(&e.product_id) {
                Some(p) => LineItem::new(&p.id, &p.name, e.quantity, p.cost),
                None => LineItem::new(&e.product_id, UNKNOWN_PRODUCT_NAME, e.quantity, Money::zero()),
            })
            .collect();

        let purchase = self.record_purchase(PurchaseRequest {
            supplier_id: supplier_id.to_string(),
            items,
        })?;
        self.remove_from_shopping_list(selected_ids);

        Ok(purchase)
    }
}
