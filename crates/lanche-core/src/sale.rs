//! # Sale Engine
//!
//! Prices a cart, deducts stock, appends the sale and settles loyalty points
//! as one state transition.
//!
//! ## Sale Arithmetic
//! ```text
//! subtotal = Σ quantity × unit_price          (per line, rounded to centavo)
//! discount = subtotal × discount_percent/100  (rounded, halves away from 0)
//! total    = subtotal − discount
//! earned   = floor(total / R$ 10)
//! customer.loyalty_points += earned − used    (no floor check)
//! ```
//!
//! ## Order of Operations
//! ```text
//! validate input ──► plan stock ──► check policy ──► build sale
//!       │                 │              │                │
//!       └── Err: nothing changed ────────┘                ▼
//!                                        apply plan, push sale, settle points
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::loyalty::points_earned;
use crate::money::Money;
use crate::state::AppState;
use crate::stock::StockPlan;
use crate::types::{items_total, LineItem, PaymentMethod, Sale};
use crate::validation::{validate_discount_percent, validate_line_items, validate_points_used};

// =============================================================================
// Request / Totals
// =============================================================================

/// Everything needed to record a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub items: Vec<LineItem>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Whole percent, 0 to 100.
    #[serde(default)]
    pub discount_percent: Option<u32>,
    #[serde(default)]
    pub loyalty_points_used: Option<i64>,
}

impl SaleRequest {
    pub fn new(items: Vec<LineItem>, payment_method: PaymentMethod) -> Self {
        Self {
            items,
            payment_method,
            customer_id: None,
            customer_name: None,
            discount_percent: None,
            loyalty_points_used: None,
        }
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_discount(mut self, percent: u32) -> Self {
        self.discount_percent = Some(percent);
        self
    }

    /// Redeems `points` for `percent` off (see `loyalty::RewardTier`).
    pub fn redeeming(mut self, points: i64, percent: u32) -> Self {
        self.loyalty_points_used = Some(points);
        self.discount_percent = Some(percent);
        self
    }
}

/// Derived amounts of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub points_earned: i64,
}

/// Computes subtotal, discount, total and earned points for `items`.
pub fn price_sale(items: &[LineItem], discount_percent: Option<u32>) -> SaleTotals {
    let subtotal = items_total(items);
    let discount = subtotal.percentage(discount_percent.unwrap_or(0));
    let total = subtotal - discount;

    SaleTotals {
        subtotal,
        discount,
        total,
        points_earned: points_earned(total),
    }
}

// =============================================================================
// Recording
// =============================================================================

impl AppState {
    /// Records a sale: validates, deducts stock, appends, settles loyalty.
    ///
    /// Returns the stored sale. On error the state is unchanged.
    pub fn record_sale(&mut self, request: SaleRequest) -> CoreResult<Sale> {
        self.record_sale_for_comanda(request, None)
    }

    pub(crate) fn record_sale_for_comanda(
        &mut self,
        request: SaleRequest,
        comanda_id: Option<String>,
    ) -> CoreResult<Sale> {
        debug!(lines = request.items.len(), "Recording sale");

        validate_line_items(&request.items)?;
        if let Some(percent) = request.discount_percent {
            validate_discount_percent(percent)?;
        }
        if let Some(points) = request.loyalty_points_used {
            validate_points_used(points)?;
        }

        let plan = StockPlan::for_sale(&self.products, &request.items);
        plan.check(&self.products, self.stock_policy)?;

        let customer_name = self.resolve_customer_name(&request);
        let totals = price_sale(&request.items, request.discount_percent);

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            items: request.items,
            subtotal: totals.subtotal,
            discount_percent: request.discount_percent,
            discount: totals.discount,
            total: totals.total,
            loyalty_points_earned: totals.points_earned,
            loyalty_points_used: request.loyalty_points_used,
            payment_method: request.payment_method,
            customer_id: request.customer_id,
            customer_name,
            comanda_id,
        };

        // Nothing below can fail.
        plan.apply(&mut self.products);
        self.settle_loyalty(&sale);
        self.sales.push(sale.clone());

        info!(
            sale_id = %sale.id,
            total = %sale.total,
            payment = sale.payment_method.as_str(),
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Explicit non-empty name wins; otherwise snapshot the customer record.
    fn resolve_customer_name(&self, request: &SaleRequest) -> Option<String> {
        let explicit = request
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        explicit.or_else(|| {
            request
                .customer_id
                .as_deref()
                .and_then(|id| self.customer(id))
                .map(|c| c.full_name())
        })
    }

    fn settle_loyalty(&mut self, sale: &Sale) {
        let Some(customer_id) = sale.customer_id.as_deref() else {
            return;
        };

        let Some(customer) = self.customers.iter_mut().find(|c| c.id == customer_id) else {
            warn!(customer = %customer_id, sale_id = %sale.id, "Sale references unknown customer, points untouched");
            return;
        };

        let used = sale.loyalty_points_used.unwrap_or(0);
        customer.loyalty_points = customer.loyalty_points - used + sale.loyalty_points_earned;
        customer.updated_at = sale.date;

        debug!(
            customer = %customer.id,
            used,
            earned = sale.loyalty_points_earned,
            balance = customer.loyalty_points,
            "Loyalty settled"
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
