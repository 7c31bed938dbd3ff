//! Shared fixtures for the terminal tests.

use crate::auth::{Role, Session};
use crate::state::Coordinator;
use lanche_core::{
    AppState, LineItem, MeasurementUnit, Money, ProductInput, ProductKind, Quantity, RecipeLine,
    SupplierInput,
};

pub(crate) fn ingredient(name: &str, stock: i64, min_stock: i64) -> ProductInput {
    ProductInput {
        kind: ProductKind::Ingredient,
        name: name.to_string(),
        category: "Insumos".to_string(),
        unit: MeasurementUnit::Un,
        supplier_id: None,
        price: Money::zero(),
        cost: Money::from_cents(150),
        stock: Quantity::from_int(stock),
        min_stock: Quantity::from_int(min_stock),
        recipe: Vec::new(),
    }
}

pub(crate) fn dish(name: &str, recipe: Vec<RecipeLine>) -> ProductInput {
    ProductInput {
        kind: ProductKind::Dish,
        name: name.to_string(),
        category: "Lanches".to_string(),
        unit: MeasurementUnit::Un,
        supplier_id: None,
        price: Money::from_cents(1500),
        cost: Money::zero(),
        stock: Quantity::zero(),
        min_stock: Quantity::zero(),
        recipe,
    }
}

/// Ingredient A (stock 10, min 5) and dish D using 3 × A.
pub(crate) fn scenario_state() -> AppState {
    let mut state = AppState::new();
    let a = state.add_product(ingredient("A", 10, 5)).unwrap();
    state
        .add_product(dish(
            "D",
            vec![RecipeLine {
                ingredient_id: a.id,
                quantity: Quantity::from_int(3),
            }],
        ))
        .unwrap();
    state
}

pub(crate) struct Scenario {
    pub coordinator: Coordinator,
    pub ingredient_id: String,
    pub dish_id: String,
}

impl Scenario {
    pub fn dish_line(&self, quantity: i64) -> LineItem {
        self.coordinator.read(|s| {
            let dish = s.products().get(&self.dish_id).unwrap();
            LineItem::from_product(dish, Quantity::from_int(quantity))
        })
    }

    pub fn add_supplier(&self) -> String {
        self.coordinator
            .mutate(|s| {
                s.add_supplier(SupplierInput {
                    name: "Padaria Central".to_string(),
                    contact: "João".to_string(),
                    email: "pedidos@padaria.com".to_string(),
                })
            })
            .unwrap()
            .id
    }
}

pub(crate) fn scenario() -> Scenario {
    let state = scenario_state();
    let ingredient_id = state.products().ingredients().next().unwrap().id.clone();
    let dish_id = state.products().dishes().next().unwrap().id.clone();
    Scenario {
        coordinator: Coordinator::in_memory(state),
        ingredient_id,
        dish_id,
    }
}

pub(crate) fn admin() -> Session {
    Session::new("u1", "Admin", Role::Admin)
}

pub(crate) fn operador() -> Session {
    Session::new("u2", "Operador", Role::Operador)
}

pub(crate) fn caixa() -> Session {
    Session::new("u3", "Caixa", Role::Caixa)
}
