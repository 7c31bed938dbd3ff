//! # lanche-core: Pure Business Logic for Lanche POS
//!
//! This crate is the **heart** of Lanche POS. It contains the recipe-driven
//! stock engine and every state transition, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lanche POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation (not in this repo)              │   │
//! │  │    PDV ──► Comandas ──► Estoque ──► Compras ──► Relatórios      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              apps/terminal (Coordinator + commands)             │   │
//! │  │    permission gate, single writer, fire-and-forget persistence  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lanche-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐ │   │
//! │  │   │  catalog  │─►│availability│─►│   stock   │─►│   sale    │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └─────┬─────┘ │   │
//! │  │                                                       │       │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌─────▼─────┐ │   │
//! │  │   │  report   │  │  loyalty   │  │ shopping  │  │  comanda  │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌──────────────┐                              │   │
//! │  │   │  expense  │─►│cash_register │                              │   │
//! │  │   └───────────┘  └──────────────┘                              │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • NO FILE SYSTEM                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    lanche-db (Database Layer)                   │   │
//! │  │            SQLite state documents, migrations, repository      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Purchase, Comanda, ...)
//! - [`money`] / [`quantity`] - Integer centavos and exact decimal quantities
//! - [`catalog`] / [`availability`] / [`stock`] - The recipe-driven stock engine
//! - [`state`] - `AppState`, the aggregate every operation mutates
//! - [`sale`], [`purchase`], [`comanda`], [`shopping_list`], [`customer`] - Operations
//! - [`expense`], [`cash_register`] - Operating costs and drawer sessions
//! - [`loyalty`], [`report`], [`advisory`] - Derived views
//! - [`error`] / [`validation`] - Typed errors and input checks
//!
//! ## Design Principles
//!
//! 1. **Validate, then mutate**: an `Err` always means nothing changed
//! 2. **Derived values are functions**: availability and totals are never stored
//! 3. **Tolerant lookups**: unknown ids inside recipes and purchases are skipped
//! 4. **Integer Money**: All monetary values are in centavos (i64)
//!
//! ## Example Usage
//!
//! ```rust
//! use lanche_core::{AppState, LineItem, Money, PaymentMethod, Quantity, SaleRequest};
//! use lanche_core::catalog::ProductInput;
//! use lanche_core::types::{MeasurementUnit, ProductKind, RecipeLine};
//!
//! let mut state = AppState::new();
//! let bread = state.add_product(ProductInput {
//!     kind: ProductKind::Ingredient,
//!     name: "Pão".into(),
//!     category: "Padaria".into(),
//!     unit: MeasurementUnit::Un,
//!     supplier_id: None,
//!     price: Money::zero(),
//!     cost: Money::from_cents(60),
//!     stock: Quantity::from_int(10),
//!     min_stock: Quantity::from_int(5),
//!     recipe: vec![],
//! }).unwrap();
//!
//! let toast = state.add_product(ProductInput {
//!     kind: ProductKind::Dish,
//!     name: "Misto".into(),
//!     category: "Lanches".into(),
//!     unit: MeasurementUnit::Un,
//!     supplier_id: None,
//!     price: Money::from_cents(1200),
//!     cost: Money::zero(),
//!     stock: Quantity::zero(),
//!     min_stock: Quantity::zero(),
//!     recipe: vec![RecipeLine { ingredient_id: bread.id.clone(), quantity: Quantity::from_int(2) }],
//! }).unwrap();
//!
//! assert_eq!(state.availability(&toast.id), Some(Quantity::from_int(5)));
//!
//! let line = LineItem::from_product(&toast, Quantity::from_int(2));
//! let sale = state.record_sale(SaleRequest::new(vec![line], PaymentMethod::Pix)).unwrap();
//!
//! assert_eq!(sale.total.cents(), 2400);
//! assert_eq!(state.availability(&toast.id), Some(Quantity::from_int(3)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod advisory;
pub mod availability;
pub mod cash_register;
pub mod catalog;
pub mod comanda;
pub mod customer;
pub mod error;
pub mod expense;
pub mod loyalty;
pub mod money;
pub mod purchase;
pub mod quantity;
pub mod report;
pub mod sale;
pub mod shopping_list;
pub mod state;
pub mod stock;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lanche_core::Money` instead of
// `use lanche_core::money::Money`

pub use cash_register::CashCount;
pub use catalog::{Catalog, ProductInput};
pub use customer::{CustomerInput, RemovalToken, SupplierInput};
pub use error::{CoreError, CoreResult, ValidationError};
pub use expense::{ExpenseFilter, ExpenseInput};
pub use money::Money;
pub use purchase::PurchaseRequest;
pub use quantity::Quantity;
pub use sale::SaleRequest;
pub use state::AppState;
pub use stock::StockPolicy;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single sale or purchase
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single sale or comanda line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum quantity of a purchase or shopping-list line
///
/// ## Business Reason
/// Ingredients are bought in g and ml (5 kg of flour is 5000 g), so supplier
/// lines run far past [`MAX_ITEM_QUANTITY`].
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;

/// Maximum unit price, cost, expense or drawer amount, in centavos (R$ 1.000.000,00)
///
/// ## Business Reason
/// Keeps every line, ticket and report total inside i64 centavos.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;
