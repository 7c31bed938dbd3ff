//! Shared fixtures for unit tests.

use crate::catalog::ProductInput;
use crate::customer::{CustomerInput, SupplierInput};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::state::AppState;
use crate::types::{MeasurementUnit, Product, ProductKind, RecipeLine};

fn recipe(lines: &[(&str, Quantity)]) -> Vec<RecipeLine> {
    lines
        .iter()
        .map(|(id, qty)| RecipeLine {
            ingredient_id: id.to_string(),
            quantity: *qty,
        })
        .collect()
}

/// Ingredient named "Ingredient {id}", cost R$ 2,00.
pub fn ingredient(id: &str, stock: Quantity, min_stock: Quantity) -> Product {
    Product {
        id: id.to_string(),
        kind: ProductKind::Ingredient,
        name: format!("Ingredient {id}"),
        category: "Insumos".to_string(),
        unit: MeasurementUnit::Un,
        supplier_id: None,
        price: Money::zero(),
        cost: Money::from_cents(200),
        stock,
        min_stock,
        recipe: vec![],
    }
}

/// Dish named "Dish {id}" in "Lanches", price R$ 15,00.
pub fn dish(id: &str, lines: &[(&str, Quantity)]) -> Product {
    Product {
        id: id.to_string(),
        kind: ProductKind::Dish,
        name: format!("Dish {id}"),
        category: "Lanches".to_string(),
        unit: MeasurementUnit::Un,
        supplier_id: None,
        price: Money::from_cents(1500),
        cost: Money::zero(),
        stock: Quantity::zero(),
        min_stock: Quantity::zero(),
        recipe: recipe(lines),
    }
}

pub fn ingredient_input(name: &str, stock: i64, min_stock: i64) -> ProductInput {
    ProductInput {
        kind: ProductKind::Ingredient,
        name: name.to_string(),
        category: "Insumos".to_string(),
        unit: MeasurementUnit::Un,
        supplier_id: None,
        price: Money::zero(),
        cost: Money::from_cents(100),
        stock: Quantity::from_int(stock),
        min_stock: Quantity::from_int(min_stock),
        recipe: vec![],
    }
}

pub fn dish_input(name: &str, lines: &[(&str, Quantity)]) -> ProductInput {
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
        recipe: recipe(lines),
    }
}

/// Ingredient A (stock 10, min 5) and dish D = [A × 3] at R$ 15,00.
pub fn scenario_state() -> AppState {
    AppState::with_products(vec![
        ingredient("a", Quantity::from_int(10), Quantity::from_int(5)),
        dish("d", &[("a", Quantity::from_int(3))]),
    ])
}

/// Customer "{first_name} Silva".
pub fn new_customer(first_name: &str) -> CustomerInput {
    CustomerInput {
        first_name: first_name.to_string(),
        last_name: "Silva".to_string(),
        phone: "11999990000".to_string(),
        email: None,
    }
}

/// Registers a supplier and returns its id.
pub fn with_supplier(state: &mut AppState) -> String {
    state
        .add_supplier(SupplierInput {
            name: "Atacadão".to_string(),
            contact: "Carlos".to_string(),
            email: "compras@atacadao.com.br".to_string(),
        })
        .unwrap()
        .id
}
