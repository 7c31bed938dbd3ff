//! # Comanda Lifecycle
//!
//! Open tabs for tables and counter customers.
//!
//! ```text
//!  open_comanda("Mesa 1")        update_comanda(id, items)       close_comanda(id, pix)
//! ┌──────────────────────┐      ┌──────────────────────┐       ┌──────────────────────┐
//! │ status: open         │ ───► │ items replaced       │ ───►  │ Sale recorded        │
//! │ items: []            │      │ total recomputed     │  ...  │ (comanda_id set)     │
//! │ total: 0             │      │                      │       │ tab leaves active set│
//! └──────────────────────┘      └──────────────────────┘       └──────────────────────┘
//! ```
//!
//! Stock is only touched at close time, through the sale engine.
//! Updating or closing an id that is not active is a no-op returning `None`.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::money::Money;
use crate::sale::SaleRequest;
use crate::state::AppState;
use crate::types::{items_total, Comanda, ComandaStatus, LineItem, PaymentMethod, Sale};
use crate::validation::{validate_comanda_items, validate_customer_name};

impl AppState {
    pub fn active_comandas(&self) -> &[Comanda] {
        &self.active_comandas
    }

    pub fn comanda(&self, id: &str) -> Option<&Comanda> {
        self.active_comandas.iter().find(|c| c.id == id)
    }

    /// Opens an empty tab under `customer_name`.
    pub fn open_comanda(&mut self, customer_name: &str) -> CoreResult<Comanda> {
        let customer_name = validate_customer_name(customer_name)?;

        let comanda = Comanda {
            id: Uuid::new_v4().to_string(),
            customer_name,
            opened_at: Utc::now(),
            items: Vec::new(),
            total: Money::zero(),
            status: ComandaStatus::Open,
        };

        self.active_comandas.push(comanda.clone());
        info!(comanda_id = %comanda.id, customer = %comanda.customer_name, "Comanda opened");
        Ok(comanda)
    }

    /// Replaces the tab's items and recomputes its total.
    ///
    /// An empty list is allowed (everything removed from the tab).
    pub fn update_comanda(
        &mut self,
        id: &str,
        items: Vec<LineItem>,
    ) -> CoreResult<Option<Comanda>> {
        validate_comanda_items(&items)?;

        let Some(comanda) = self.active_comandas.iter_mut().find(|c| c.id == id) else {
            debug!(comanda_id = %id, "Update for inactive comanda ignored");
            return Ok(None);
        };

        comanda.total = items_total(&items);
        comanda.items = items;

        debug!(comanda_id = %id, total = %comanda.total, "Comanda updated");
        Ok(Some(comanda.clone()))
    }

    /// Records the tab as a sale and removes it from the active set.
    ///
    /// If the sale cannot be recorded the tab stays open and untouched.
    pub fn close_comanda(
        &mut self,
        id: &str,
        payment_method: PaymentMethod,
    ) -> CoreResult<Option<Sale>> {
        let Some(index) = self.active_comandas.iter().position(|c| c.id == id) else {
            debug!(comanda_id = %id, "Close for inactive comanda ignored");
            return Ok(None);
        };

        let comanda = &self.active_comandas[index];
        let request = SaleRequest::new(comanda.items.clone(), payment_method)
            .with_customer_name(comanda.customer_name.clone());

        let sale = self.record_sale_for_comanda(request, Some(id.to_string()))?;
        self.active_comandas.remove(index);

        info!(comanda_id = %id, sale_id = %sale.id, "Comanda closed");
        Ok(Some(sale))
    }
}
