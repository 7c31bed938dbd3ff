//! # Comanda Commands
//!
//! Open tabs: opened at a table, edited while the customer orders, closed
//! into a single sale. Closing is the only step that touches stock.

use tracing::debug;

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::{Comanda, LineItem, PaymentMethod, Sale};

pub fn list_active_comandas(coordinator: &Coordinator, session: &Session) -> Result<Vec<Comanda>, ApiError> {
    session.require(Permission::ViewPos)?;
    Ok(coordinator.read(|state| state.active_comandas().to_vec()))
}

pub fn open_comanda(
    coordinator: &Coordinator,
    session: &Session,
    customer_name: &str,
) -> Result<Comanda, ApiError> {
    debug!(customer = %customer_name, "open_comanda command");
    session.require(Permission::ViewPos)?;

    coordinator.mutate(|state| state.open_comanda(customer_name))
}

/// Replaces the tab's items. `None` when no active tab has that id.
pub fn update_comanda(
    coordinator: &Coordinator,
    session: &Session,
    comanda_id: &str,
    items: Vec<LineItem>,
) -> Result<Option<Comanda>, ApiError> {
    debug!(comanda_id = %comanda_id, items = items.len(), "update_comanda command");
    session.require(Permission::ViewPos)?;

    coordinator.mutate(|state| state.update_comanda(comanda_id, items))
}

/// Settles the tab into a sale. `None` when no active tab has that id.
pub fn close_comanda(
    coordinator: &Coordinator,
    session: &Session,
    comanda_id: &str,
    payment_method: PaymentMethod,
) -> Result<Option<Sale>, ApiError> {
    debug!(comanda_id = %comanda_id, method = payment_method.as_str(), "close_comanda command");
    session.require(Permission::ViewPos)?;

    coordinator.mutate(|state| state.close_comanda(comanda_id, payment_method))
}
