//! # Application State
//!
//! The single aggregate every operation mutates.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              AppState                                   │
//! │                                                                         │
//! │  products ─ suppliers ─ customers ─ sales ─ purchases                   │
//! │  shopping_list ─ active_comandas ─ expenses ─ cash_registers            │
//! │                                                                         │
//! │  Sibling collections, persisted together after every mutation.         │
//! │  Fields are private: mutation happens only through the operations      │
//! │  in sale.rs, purchase.rs, comanda.rs, shopping_list.rs, customer.rs,   │
//! │  expense.rs, cash_register.rs and the catalog writes below.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each top-level serialised key (`products`, `shoppingList`, ...) is one
//! persisted concern; see [`AppState::CONCERNS`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::availability::max_producible;
use crate::catalog::{Catalog, ProductInput};
use crate::error::CoreResult;
use crate::quantity::Quantity;
use crate::stock::StockPolicy;
use crate::types::{
    CashRegister, Comanda, Customer, Expense, Product, Purchase, Sale, ShoppingListItem, Supplier,
};

/// Everything the terminal knows, owned by one writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub(crate) products: Catalog,
    #[serde(default)]
    pub(crate) suppliers: Vec<Supplier>,
    #[serde(default)]
    pub(crate) customers: Vec<Customer>,
    #[serde(default)]
    pub(crate) sales: Vec<Sale>,
    #[serde(default)]
    pub(crate) purchases: Vec<Purchase>,
    #[serde(default)]
    pub(crate) shopping_list: Vec<ShoppingListItem>,
    #[serde(default)]
    pub(crate) active_comandas: Vec<Comanda>,
    #[serde(default)]
    pub(crate) expenses: Vec<Expense>,
    /// Every drawer session; at most one is open.
    #[serde(default)]
    pub(crate) cash_registers: Vec<CashRegister>,

    /// Runtime setting, not persisted.
    #[serde(skip)]
    pub(crate) stock_policy: StockPolicy,

    /// token → customer id awaiting confirmation.
    #[serde(skip)]
    pub(crate) pending_removals: HashMap<String, String>,
}

impl AppState {
    /// Persisted concern keys, in the order they are written.
    pub const CONCERNS: [&'static str; 9] = [
        "products",
        "suppliers",
        "customers",
        "sales",
        "purchases",
        "shoppingList",
        "activeComandas",
        "expenses",
        "cashRegisters",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing catalog (seeding and tests).
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Catalog::new(products),
            ..Self::default()
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn products(&self) -> &Catalog {
        &self.products
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn shopping_list(&self) -> &[ShoppingListItem] {
        &self.shopping_list
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    pub fn set_stock_policy(&mut self, policy: StockPolicy) {
        self.stock_policy = policy;
    }

    /// Max producible units of `product_id`, `None` when unknown.
    pub fn availability(&self, product_id: &str) -> Option<Quantity> {
        self.products
            .get(product_id)
            .map(|p| max_producible(p, &self.products))
    }

    // =========================================================================
    // Catalog writes
    // =========================================================================

    /// Adds a product under a fresh id.
    pub fn add_product(&mut self, input: ProductInput) -> CoreResult<Product> {
        let id = Uuid::new_v4().to_string();
        let product = self.products.insert(id, input)?.clone();
        info!(product_id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Replaces the editable fields of an existing product.
    pub fn update_product(&mut self, id: &str, input: ProductInput) -> CoreResult<Product> {
        let product = self.products.replace(id, input)?.clone();
        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dish_input, ingredient_input, scenario_state};

    #[test]
    fn test_scenario_availability() {
        let state = scenario_state();
        assert_eq!(state.availability("a"), Some(Quantity::from_int(10)));
        assert_eq!(state.availability("d"), Some(Quantity::from_int(3)));
        assert_eq!(state.availability("ghost"), None);
    }

    #[test]
    fn test_add_and_update_product() {
        let mut state = AppState::new();
        let bread = state.add_product(ingredient_input("Pão", 30, 10)).unwrap();
        let dish = state
            .add_product(dish_input("Misto", &[(bread.id.as_str(), Quantity::from_int(2))]))
            .unwrap();

        assert_eq!(state.availability(&dish.id), Some(Quantity::from_int(15)));

        state
            .update_product(&bread.id, ingredient_input("Pão", 5, 10))
            .unwrap();
        assert_eq!(state.availability(&dish.id), Some(Quantity::from_int(2)));
    }

    #[test]
    fn test_update_cannot_turn_recipe_ingredient_into_dish() {
        let mut state = scenario_state();
        assert_eq!(state.availability("d"), Some(Quantity::from_int(3)));

        assert!(matches!(
            state.update_product("a", dish_input("A", &[])),
            Err(crate::error::CoreError::IngredientInUse { .. })
        ));
        assert!(state.products().get("a").unwrap().is_ingredient());
        assert_eq!(state.availability("d"), Some(Quantity::from_int(3)));
    }

    #[test]
    fn test_serialised_keys_match_concerns() {
        let state = scenario_state();
        let json = serde_json::to_value(&state).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), AppState::CONCERNS.len());
        for concern in AppState::CONCERNS {
            assert!(object.contains_key(concern), "missing {concern}");
        }
    }

    #[test]
    fn test_round_trip_drops_runtime_settings() {
        let mut state = scenario_state();
        state.set_stock_policy(StockPolicy::RejectNegative);

        let json = serde_json::to_string(&state).unwrap();
        let restored: AppState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.products(), state.products());
        assert_eq!(restored.stock_policy(), StockPolicy::AllowNegative);
    }
}
