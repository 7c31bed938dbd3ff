//! # Commands Module
//!
//! Entry points a presentation layer calls. Each command takes the
//! [`Coordinator`](crate::state::Coordinator) and the caller's
//! [`Session`](crate::auth::Session), checks a permission first, then
//! delegates to `lanche-core`.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (exports)
//! ├── catalog.rs        ◄─── Products, availability, suppliers
//! ├── sale.rs           ◄─── Quote and record sales
//! ├── purchase.rs       ◄─── Record purchases
//! ├── comanda.rs        ◄─── Open / update / close tabs
//! ├── shopping_list.rs  ◄─── Restock list and conversion to a purchase
//! ├── customer.rs       ◄─── Customers, history, two-phase removal, rewards
//! ├── expense.rs        ◄─── Operating costs and category totals
//! ├── cash_register.rs  ◄─── Open / close the drawer, shift history
//! ├── report.rs         ◄─── Dashboard, sales and financial reports
//! └── advisory.rs       ◄─── Business insight, restock suggestion
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  close_comanda(&coordinator, &session, "c-1", PaymentMethod::Pix)      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  session.require(Permission::ViewPos)?      ◄── FORBIDDEN on failure   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  coordinator.mutate(|s| s.close_comanda(..)) ◄── lock, run, snapshot   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<Option<Sale>, ApiError>                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Read-only commands use `coordinator.read` and never schedule a save.

pub mod advisory;
pub mod cash_register;
pub mod catalog;
pub mod comanda;
pub mod customer;
pub mod expense;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod shopping_list;
