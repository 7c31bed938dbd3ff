//! # Catalog
//!
//! The product collection: every ingredient and dish the lanchonete knows.
//!
//! ```text
//! ┌──────────────────────┐        recipe line        ┌──────────────────────┐
//! │ Dish (prato)         │ ────────────────────────► │ Ingredient (insumo)  │
//! │ stock = 0 always     │   ingredient_id, qty/un   │ stock, min_stock     │
//! └──────────────────────┘                           └──────────────────────┘
//! ```
//!
//! Lookups are tolerant (`Option`); writes are strict: a dish can only be
//! stored when every recipe line points at an existing ingredient with a
//! positive per-unit quantity.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{MeasurementUnit, Product, ProductKind, RecipeLine};
use crate::validation::{validate_price, validate_product_name, validate_stock_level, validate_text};

/// Ordered product collection, persisted as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog(Vec<Product>);

/// Editable product fields for `add_product` / `update_product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(rename = "type")]
    pub kind: ProductKind,
    pub name: String,
    pub category: String,
    pub unit: MeasurementUnit,
    #[serde(default)]
    pub supplier_id: Option<String>,
    pub price: Money,
    pub cost: Money,
    #[serde(default)]
    pub stock: Quantity,
    #[serde(default)]
    pub min_stock: Quantity,
    #[serde(default)]
    pub recipe: Vec<RecipeLine>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self(products)
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.0.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.0.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.0.iter()
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &Product> {
        self.0.iter().filter(|p| p.is_ingredient())
    }

    pub fn dishes(&self) -> impl Iterator<Item = &Product> {
        self.0.iter().filter(|p| p.is_dish())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validates `input` and appends it under `id`.
    pub fn insert(&mut self, id: String, input: ProductInput) -> CoreResult<&Product> {
        if self.contains(&id) {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: id,
            }
            .into());
        }
        let product = self.build(id, input)?;
        let index = self.0.len();
        self.0.push(product);
        Ok(&self.0[index])
    }

    /// Validates `input` and replaces the product stored under `id`.
    ///
    /// An ingredient cannot turn into a dish while any recipe uses it.
    pub fn replace(&mut self, id: &str, input: ProductInput) -> CoreResult<&Product> {
        let index = self
            .0
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        if self.0[index].is_ingredient() && input.kind == ProductKind::Dish {
            let users: Vec<&str> = self.dishes_using(id).map(|d| d.name.as_str()).collect();
            if !users.is_empty() {
                return Err(CoreError::IngredientInUse {
                    ingredient: self.0[index].name.clone(),
                    dishes: users.join(", "),
                });
            }
        }

        let product = self.build(id.to_string(), input)?;
        self.0[index] = product;
        Ok(&self.0[index])
    }

    fn build(&self, id: String, input: ProductInput) -> CoreResult<Product> {
        let name = validate_product_name(&input.name)?;
        let category = validate_text("category", &input.category, 100)?;
        validate_price("price", input.price)?;
        validate_price("cost", input.cost)?;
        validate_stock_level("stock", input.stock)?;
        validate_stock_level("min stock", input.min_stock)?;

        let (stock, recipe) = match input.kind {
            ProductKind::Ingredient => (input.stock, Vec::new()),
            ProductKind::Dish => {
                self.check_recipe(&name, &id, &input.recipe)?;
                (Quantity::zero(), input.recipe)
            }
        };

        Ok(Product {
            id,
            kind: input.kind,
            name,
            category,
            unit: input.unit,
            supplier_id: input.supplier_id.filter(|s| !s.trim().is_empty()),
            price: input.price,
            cost: input.cost,
            stock,
            min_stock: input.min_stock,
            recipe,
        })
    }

    /// Dishes whose recipe has a line for `ingredient_id`.
    pub fn dishes_using<'a>(&'a self, ingredient_id: &'a str) -> impl Iterator<Item = &'a Product> {
        self.dishes()
            .filter(move |d| d.recipe.iter().any(|l| l.ingredient_id == ingredient_id))
    }

    /// Every line must reference an existing ingredient with qty > 0.
    fn check_recipe(&self, dish: &str, dish_id: &str, recipe: &[RecipeLine]) -> CoreResult<()> {
        for line in recipe {
            let invalid = |reason: String| CoreError::InvalidRecipe {
                dish: dish.to_string(),
                reason,
            };

            if line.ingredient_id == dish_id {
                return Err(invalid("a dish cannot contain itself".to_string()));
            }
            match self.get(&line.ingredient_id) {
                None => {
                    return Err(invalid(format!(
                        "unknown ingredient {}",
                        line.ingredient_id
                    )))
                }
                Some(p) if !p.is_ingredient() => {
                    return Err(invalid(format!("{} is not an ingredient", p.name)))
                }
                Some(_) => {}
            }
            if !line.quantity.is_positive() {
                return Err(invalid(format!(
                    "quantity for {} must be positive",
                    line.ingredient_id
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Catalog::new(iter.into_iter().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
