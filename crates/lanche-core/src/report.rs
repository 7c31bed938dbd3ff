//! # Reports
//!
//! Read-only summaries over the current state, recomputed on demand.
//!
//! ```text
//! ┌─────────────────────┬───────────────────────────────────────────────┐
//! │ low_stock_report    │ ingredients at or below min_stock             │
//! │ production_capacity │ per dish: units producible + bottleneck       │
//! │ dashboard_metrics   │ revenue, spend, ticket, low-stock count       │
//! │ top_products        │ best sellers by revenue                       │
//! │ sales_by_category   │ revenue per catalog category                  │
//! │ sales_by_payment_…  │ revenue per cash / card / pix                 │
//! │ daily_totals        │ zero-filled revenue per day, oldest first     │
//! │ daily_financials    │ sales, purchases, expenses and net per day    │
//! │ customer_history    │ one customer's sales, spend and favourites    │
//! └─────────────────────┴───────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::availability::capacity;
use crate::catalog::Catalog;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::state::AppState;
use crate::types::{Customer, Expense, MeasurementUnit, PaymentMethod, Purchase, Sale};

/// Category label for sold products no longer in the catalog.
pub const UNCATEGORISED: &str = "Outros";

/// Favourite products listed in a customer history.
pub const FAVORITE_PRODUCTS_LIMIT: usize = 3;

/// Rounded to the nearest centavo; zero for an empty set.
fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        return Money::zero();
    }
    let n = count as i64;
    Money::from_cents((total.cents() * 2 + n) / (2 * n))
}

// =============================================================================
// Stock reports
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LowStockSeverity {
    /// Empty or oversold (stock ≤ 0).
    Critical,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub product_id: String,
    pub name: String,
    pub unit: MeasurementUnit,
    /// Raw stock, negative when oversold.
    pub stock: Quantity,
    pub min_stock: Quantity,
    pub severity: LowStockSeverity,
}

/// Ingredients with `stock ≤ min_stock`, critical ones first.
pub fn low_stock_report(catalog: &Catalog) -> Vec<LowStockEntry> {
    let mut entries: Vec<LowStockEntry> = catalog
        .ingredients()
        .filter(|p| p.stock <= p.min_stock)
        .map(|p| LowStockEntry {
            product_id: p.id.clone(),
            name: p.name.clone(),
            unit: p.unit,
            stock: p.stock,
            min_stock: p.min_stock,
            severity: if p.stock.is_positive() {
                LowStockSeverity::Low
            } else {
                LowStockSeverity::Critical
            },
        })
        .collect();

    entries.sort_by(|a, b| {
        let rank = |s: LowStockSeverity| (s == LowStockSeverity::Low) as u8;
        rank(a.severity)
            .cmp(&rank(b.severity))
            .then_with(|| a.name.cmp(&b.name))
    });
    entries
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductionCapacityEntry {
    pub dish_id: String,
    pub name: String,
    pub units: Quantity,
    pub bottleneck_id: Option<String>,
    pub bottleneck_name: Option<String>,
}

/// Producible units and limiting ingredient for every dish.
pub fn production_capacity(catalog: &Catalog) -> Vec<ProductionCapacityEntry> {
    catalog
        .dishes()
        .map(|dish| {
            let cap = capacity(dish, catalog);
            let bottleneck_name = cap
                .bottleneck
                .as_deref()
                .and_then(|id| catalog.get(id))
                .map(|p| p.name.clone());
            ProductionCapacityEntry {
                dish_id: dish.id.clone(),
                name: dish.name.clone(),
                units: cap.units,
                bottleneck_id: cap.bottleneck,
                bottleneck_name,
            }
        })
        .collect()
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_sales: Money,
    pub total_purchases: Money,
    pub sale_count: usize,
    /// Rounded to the nearest centavo; zero without sales.
    pub average_ticket: Money,
    pub low_stock_count: usize,
}

pub fn dashboard_metrics(state: &AppState) -> DashboardMetrics {
    let total_sales: Money = state.sales().iter().map(|s| s.total).sum();
    let total_purchases: Money = state.purchases().iter().map(|p| p.total).sum();
    let sale_count = state.sales().len();

    DashboardMetrics {
        total_sales,
        total_purchases,
        sale_count,
        average_ticket: average(total_sales, sale_count),
        low_stock_count: state.products().iter().filter(|p| p.is_low_stock()).count(),
    }
}

// =============================================================================
// Sales breakdowns
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRevenue {
    pub product_id: String,
    pub name: String,
    pub quantity: Quantity,
    pub revenue: Money,
}

/// Best sellers by line revenue, highest first, at most `n`.
pub fn top_products(sales: &[Sale], n: usize) -> Vec<ProductRevenue> {
    let mut by_product: HashMap<&str, ProductRevenue> = HashMap::new();

    for item in sales.iter().flat_map(|s| &s.items) {
        let entry = by_product
            .entry(item.product_id.as_str())
            .or_insert_with(|| ProductRevenue {
                product_id: item.product_id.clone(),
                name: item.product_name.clone(),
                quantity: Quantity::zero(),
                revenue: Money::zero(),
            });
        entry.quantity += item.quantity;
        entry.revenue += item.line_total();
    }

    let mut ranked: Vec<ProductRevenue> = by_product.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

/// Line revenue grouped by the product's current category, highest first.
pub fn sales_by_category(sales: &[Sale], catalog: &Catalog) -> Vec<CategoryTotal> {
    let mut totals: HashMap<String, Money> = HashMap::new();

    for item in sales.iter().flat_map(|s| &s.items) {
        let category = catalog
            .get(&item.product_id)
            .map(|p| p.category.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORISED.to_string());
        *totals.entry(category).or_default() += item.line_total();
    }

    let mut result: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    result.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    result
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodTotal {
    pub method: PaymentMethod,
    pub count: usize,
    pub total: Money,
}

/// Sale totals per payment method, always cash, card, pix in that order.
pub fn sales_by_payment_method(sales: &[Sale]) -> Vec<PaymentMethodTotal> {
    [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Pix]
        .into_iter()
        .map(|method| {
            let matching = sales.iter().filter(|s| s.payment_method == method);
            PaymentMethodTotal {
                method,
                count: matching.clone().count(),
                total: matching.map(|s| s.total).sum(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
    pub count: usize,
}

/// The `days` dates ending at `today`, oldest first.
fn window(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    let Some(start) = days
        .checked_sub(1)
        .and_then(|back| today.checked_sub_days(Days::new(back as u64)))
    else {
        return Vec::new();
    };
    start.iter_days().take(days as usize).collect()
}

/// Revenue for each of the `days` days ending at `today` (UTC dates).
pub fn daily_totals(sales: &[Sale], today: NaiveDate, days: u32) -> Vec<DailyTotal> {
    window(today, days)
        .into_iter()
        .map(|date| {
            let matching = sales.iter().filter(|s| s.date.date_naive() == date);
            DailyTotal {
                date,
                count: matching.clone().count(),
                total: matching.map(|s| s.total).sum(),
            }
        })
        .collect()
}

// =============================================================================
// Financials
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyFinancial {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_sales: Money,
    pub total_purchases: Money,
    pub total_expenses: Money,
    /// `total_sales - total_purchases - total_expenses`, negative on a losing day.
    pub net_balance: Money,
}

/// Money in and out for each of the `days` days ending at `today`.
///
/// Sales and purchases fall on their UTC date; expenses on their own `date`.
pub fn daily_financials(
    sales: &[Sale],
    purchases: &[Purchase],
    expenses: &[Expense],
    today: NaiveDate,
    days: u32,
) -> Vec<DailyFinancial> {
    window(today, days)
        .into_iter()
        .map(|date| {
            let total_sales: Money = sales
                .iter()
                .filter(|s| s.date.date_naive() == date)
                .map(|s| s.total)
                .sum();
            let total_purchases: Money = purchases
                .iter()
                .filter(|p| p.date.date_naive() == date)
                .map(|p| p.total)
                .sum();
            let total_expenses: Money = expenses
                .iter()
                .filter(|e| e.date == date)
                .map(|e| e.amount)
                .sum();
            DailyFinancial {
                date,
                total_sales,
                total_purchases,
                total_expenses,
                net_balance: total_sales - total_purchases - total_expenses,
            }
        })
        .collect()
}

// =============================================================================
// Customer history
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProduct {
    pub product_id: String,
    pub name: String,
    pub quantity: Quantity,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHistory {
    pub customer_id: String,
    pub customer_name: String,
    /// Newest first.
    pub sales: Vec<Sale>,
    pub total_spent: Money,
    pub sale_count: usize,
    pub average_ticket: Money,
    /// Most units bought, at most [`FAVORITE_PRODUCTS_LIMIT`].
    pub favorite_products: Vec<FavoriteProduct>,
    /// Current balance, not a sum over `sales`.
    pub loyalty_points: i64,
}

/// Sales linked to `customer` by id, or by the same full name
/// (case-insensitive) for sales recorded without an id.
pub fn customer_history(customer: &Customer, sales: &[Sale]) -> CustomerHistory {
    let full_name = customer.full_name().to_lowercase();
    let belongs = |sale: &Sale| match &sale.customer_id {
        Some(id) => *id == customer.id,
        None => sale
            .customer_name
            .as_deref()
            .is_some_and(|name| name.trim().to_lowercase() == full_name),
    };

    let mut history: Vec<Sale> = sales.iter().filter(|s| belongs(s)).cloned().collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    let total_spent: Money = history.iter().map(|s| s.total).sum();

    let mut by_product: HashMap<&str, FavoriteProduct> = HashMap::new();
    for item in history.iter().flat_map(|s| &s.items) {
        let entry = by_product
            .entry(item.product_id.as_str())
            .or_insert_with(|| FavoriteProduct {
                product_id: item.product_id.clone(),
                name: item.product_name.clone(),
                quantity: Quantity::zero(),
                total: Money::zero(),
            });
        entry.quantity += item.quantity;
        entry.total += item.line_total();
    }
    let mut favorite_products: Vec<FavoriteProduct> = by_product.into_values().collect();
    favorite_products.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    favorite_products.truncate(FAVORITE_PRODUCTS_LIMIT);

    CustomerHistory {
        customer_id: customer.id.clone(),
        customer_name: customer.full_name(),
        sale_count: history.len(),
        average_ticket: average(total_spent, history.len()),
        total_spent,
        sales: history,
        favorite_products,
        loyalty_points: customer.loyalty_points,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
