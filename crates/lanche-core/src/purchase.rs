//! # Purchases
//!
//! Receiving goods from a supplier: append the purchase, raise stock.
//! Purchases are recorded already `received`; there is no ordering workflow.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::state::AppState;
use crate::stock::StockPlan;
use crate::types::{items_total, LineItem, Purchase, PurchaseStatus};
use crate::validation::validate_purchase_items;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub supplier_id: String,
    /// `unit_price` is the cost paid per unit.
    pub items: Vec<LineItem>,
}

impl AppState {
    /// Records a received purchase and raises ingredient stock.
    ///
    /// Dish lines and unknown product ids stay on the purchase record but
    /// do not move stock.
    pub fn record_purchase(&mut self, request: PurchaseRequest) -> CoreResult<Purchase> {
        debug!(supplier = %request.supplier_id, lines = request.items.len(), "Recording purchase");

        validate_purchase_items(&request.items)?;
        if self.supplier(&request.supplier_id).is_none() {
            return Err(CoreError::SupplierNotFound(request.supplier_id));
        }

        let plan = StockPlan::for_purchase(&self.products, &request.items);

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            supplier_id: request.supplier_id,
            total: items_total(&request.items),
            items: request.items,
            status: PurchaseStatus::Received,
        };

        plan.apply(&mut self.products);
        self.purchases.push(purchase.clone());

        info!(purchase_id = %purchase.id, total = %purchase.total, "Purchase recorded");
        Ok(purchase)
    }
}
