//! # Catalog Commands
//!
//! Product listing with live availability, product maintenance and
//! suppliers.

use serde::Serialize;
use tracing::debug;

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::{Product, ProductInput, Quantity, Supplier, SupplierInput};

/// A product together with how many units can be sold right now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub availability: Quantity,
    pub low_stock: bool,
}

pub fn list_products(coordinator: &Coordinator, session: &Session) -> Result<Vec<ProductView>, ApiError> {
    session.require(Permission::ViewPos)?;

    Ok(coordinator.read(|state| {
        state
            .products()
            .iter()
            .map(|product| ProductView {
                availability: state.availability(&product.id).unwrap_or_default(),
                low_stock: product.is_low_stock(),
                product: product.clone(),
            })
            .collect()
    }))
}

pub fn get_availability(
    coordinator: &Coordinator,
    session: &Session,
    product_id: &str,
) -> Result<Quantity, ApiError> {
    debug!(product_id = %product_id, "get_availability command");
    session.require(Permission::ViewPos)?;

    coordinator
        .read(|state| state.availability(product_id))
        .ok_or_else(|| ApiError::not_found("Product", product_id))
}

pub fn add_product(
    coordinator: &Coordinator,
    session: &Session,
    input: ProductInput,
) -> Result<Product, ApiError> {
    debug!(name = %input.name, kind = ?input.kind, "add_product command");
    session.require(Permission::ManageProducts)?;

    coordinator.mutate(|state| state.add_product(input))
}

pub fn update_product(
    coordinator: &Coordinator,
    session: &Session,
    product_id: &str,
    input: ProductInput,
) -> Result<Product, ApiError> {
    debug!(product_id = %product_id, "update_product command");
    session.require(Permission::ManageProducts)?;

    coordinator.mutate(|state| state.update_product(product_id, input))
}

pub fn list_suppliers(coordinator: &Coordinator, session: &Session) -> Result<Vec<Supplier>, ApiError> {
    session.require(Permission::ViewPurchases)?;
    Ok(coordinator.read(|state| state.suppliers().to_vec()))
}

pub fn add_supplier(
    coordinator: &Coordinator,
    session: &Session,
    input: SupplierInput,
) -> Result<Supplier, ApiError> {
    debug!(name = %input.name, "add_supplier command");
    session.require(Permission::ManageSuppliers)?;

    coordinator.mutate(|state| state.add_supplier(input))
}
