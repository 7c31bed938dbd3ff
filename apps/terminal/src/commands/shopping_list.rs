//! # Shopping List Commands
//!
//! ```text
//!   low stock ──auto_fill──► shopping list ──process──► Purchase (stock ↑)
//!                              ▲      │
//!                 add (manual) ┘      └ remove
//! ```

use serde::Serialize;
use tracing::debug;

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::shopping_list::UNKNOWN_PRODUCT_NAME;
use lanche_core::{Money, Purchase, Quantity, ShoppingListItem};

/// A list entry with the product details needed to display it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListLine {
    #[serde(flatten)]
    pub item: ShoppingListItem,
    pub product_name: String,
    pub current_stock: Option<Quantity>,
    /// `quantity × cost`; zero for products no longer in the catalog.
    pub estimated_cost: Money,
}

pub fn list_shopping_list(
    coordinator: &Coordinator,
    session: &Session,
) -> Result<Vec<ShoppingListLine>, ApiError> {
    session.require(Permission::ViewShoppingList)?;

    Ok(coordinator.read(|state| {
        state
            .shopping_list()
            .iter()
            .map(|item| {
                let product = state.products().get(&item.product_id);
                ShoppingListLine {
                    product_name: product
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
                    current_stock: product.map(|p| p.stock),
                    estimated_cost: product
                        .map(|p| p.cost.multiply_quantity(item.quantity))
                        .unwrap_or_default(),
                    item: item.clone(),
                }
            })
            .collect()
    }))
}

pub fn add_to_shopping_list(
    coordinator: &Coordinator,
    session: &Session,
    product_id: &str,
    quantity: Quantity,
) -> Result<ShoppingListItem, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "add_to_shopping_list command");
    session.require(Permission::ViewShoppingList)?;

    coordinator.mutate(|state| state.add_to_shopping_list(product_id, quantity))
}

/// Returns how many suggestions were added.
pub fn auto_fill_low_stock(coordinator: &Coordinator, session: &Session) -> Result<usize, ApiError> {
    session.require(Permission::ViewShoppingList)?;
    coordinator.mutate(|state| Ok(state.auto_fill_low_stock()))
}

pub fn remove_from_shopping_list(
    coordinator: &Coordinator,
    session: &Session,
    ids: &[String],
) -> Result<usize, ApiError> {
    debug!(count = ids.len(), "remove_from_shopping_list command");
    session.require(Permission::ViewShoppingList)?;

    coordinator.mutate(|state| Ok(state.remove_from_shopping_list(ids)))
}

/// Buys the selected entries; needs both list and purchase access.
pub fn process_shopping_list_to_purchase(
    coordinator: &Coordinator,
    session: &Session,
    selected_ids: &[String],
    supplier_id: &str,
) -> Result<Purchase, ApiError> {
    debug!(count = selected_ids.len(), supplier_id = %supplier_id, "process_shopping_list_to_purchase command");
    session.require(Permission::ViewShoppingList)?;
    session.require(Permission::ViewPurchases)?;

    coordinator.mutate(|state| state.process_shopping_list_to_purchase(selected_ids, supplier_id))
}
