//! # Domain Types
//!
//! Core domain types used throughout Lanche POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Purchase     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  kind: insumo   │   │  items (snap)   │   │  supplier_id    │       │
//! │  │     or prato    │   │  subtotal       │   │  items (cost)   │       │
//! │  │  stock (insumo) │   │  discount       │   │  total          │       │
//! │  │  recipe (prato) │   │  total, points  │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Comanda      │   │    Customer     │   │ShoppingListItem │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  open tab       │   │  loyalty_points │   │  product_id     │       │
//! │  │  items, total   │   │  (Sale Engine)  │   │  quantity (acc) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Expense      │   │  CashRegister   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  category       │   │  open / closed  │                             │
//! │  │  amount, method │   │  expected vs    │                             │
//! │  │                 │   │  counted cash   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! Every type serialises as camelCase JSON. Product `kind` is written as
//! `"type": "insumo" | "prato"`, money as integer centavos and quantities as
//! plain JSON numbers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Product
// =============================================================================

/// Whether a product is bought and stocked or composed and sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ProductKind {
    /// Raw ingredient: bought from suppliers, carries stock.
    #[serde(rename = "insumo")]
    Ingredient,
    /// Sellable dish: composed from ingredients via its recipe.
    #[serde(rename = "prato")]
    Dish,
}

/// Unit a product is stocked and sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    Un,
    Kg,
    G,
    L,
    Ml,
}

impl Default for MeasurementUnit {
    fn default() -> Self {
        MeasurementUnit::Un
    }
}

/// One line of a dish recipe: how much of an ingredient one unit consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLine {
    pub ingredient_id: String,
    /// Amount of the ingredient consumed per unit of the dish.
    pub quantity: Quantity,
}

/// A catalog entry: either an ingredient or a dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ProductKind,

    pub name: String,

    pub category: String,

    pub unit: MeasurementUnit,

    /// Preferred supplier, used by the restock advisory.
    #[serde(default)]
    pub supplier_id: Option<String>,

    /// Sale price (0 for internal ingredients usually).
    pub price: Money,

    /// Purchase cost, snapshotted into purchase lines.
    pub cost: Money,

    /// On-hand stock. Meaningful for ingredients only; dishes keep 0.
    pub stock: Quantity,

    /// Reorder threshold.
    pub min_stock: Quantity,

    /// Ordered recipe lines. Empty for ingredients.
    #[serde(default)]
    pub recipe: Vec<RecipeLine>,
}

impl Product {
    #[inline]
    pub fn is_ingredient(&self) -> bool {
        self.kind == ProductKind::Ingredient
    }

    #[inline]
    pub fn is_dish(&self) -> bool {
        self.kind == ProductKind::Dish
    }

    /// True when an ingredient sits at or below its reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.is_ingredient() && self.stock <= self.min_stock
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// A cart/sale/purchase line.
/// Uses snapshot pattern to freeze product data at time of the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    /// Product name at time of the transaction (frozen).
    pub product_name: String,
    pub quantity: Quantity,
    /// Sale price, or cost for purchase lines (frozen).
    pub unit_price: Money,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: Quantity,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }

    /// Snapshots a catalog product at its current sale price.
    pub fn from_product(product: &Product, quantity: Quantity) -> Self {
        Self::new(&product.id, &product.name, quantity, product.price)
    }

    /// quantity × unit_price, rounded to the centavo.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Sum of line totals.
pub fn items_total(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Brazilian instant transfer.
    Pix,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Pix => "pix",
        }
    }
}

/// A completed sale. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    #[serde(default)]
    pub discount_percent: Option<u32>,
    pub discount: Money,
    pub total: Money,
    pub loyalty_points_earned: i64,
    #[serde(default)]
    pub loyalty_points_used: Option<i64>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Set when the sale was created by closing a tab.
    #[serde(default)]
    pub comanda_id: Option<String>,
}

// =============================================================================
// Purchase
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Ordered,
    Received,
}

impl Default for PurchaseStatus {
    fn default() -> Self {
        PurchaseStatus::Received
    }
}

/// A supplier purchase. `unit_price` on its lines is the cost snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub supplier_id: String,
    pub items: Vec<LineItem>,
    pub total: Money,
    pub status: PurchaseStatus,
}

// =============================================================================
// Comanda
// =============================================================================

/// Closing removes a tab from the active set, so stored tabs are `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ComandaStatus {
    Open,
    Closed,
}

/// An open tab: items accrue until it is closed into a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Comanda {
    pub id: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    /// Always equals `items_total(&items)`.
    pub total: Money,
    pub status: ComandaStatus,
}

// =============================================================================
// Shopping List
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    pub product_id: String,
    pub quantity: Quantity,
}

// =============================================================================
// People
// =============================================================================

/// A registered customer taking part in the loyalty program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(rename = "nome")]
    pub first_name: String,
    #[serde(rename = "sobrenome")]
    pub last_name: String,
    #[serde(rename = "fone")]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Mutated only by the sale engine. May go negative.
    pub loyalty_points: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub email: String,
}

// =============================================================================
// Expenses
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ExpenseCategory {
    #[serde(rename = "salarios")]
    Salaries,
    #[serde(rename = "aluguel")]
    Rent,
    #[serde(rename = "energia")]
    Electricity,
    #[serde(rename = "agua")]
    Water,
    #[serde(rename = "gas")]
    Gas,
    #[serde(rename = "telefone")]
    Phone,
    #[serde(rename = "manutencao")]
    Maintenance,
    #[serde(rename = "impostos")]
    Taxes,
    #[serde(rename = "outros")]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Salaries,
        ExpenseCategory::Rent,
        ExpenseCategory::Electricity,
        ExpenseCategory::Water,
        ExpenseCategory::Gas,
        ExpenseCategory::Phone,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Taxes,
        ExpenseCategory::Other,
    ];

    /// Label shown on screen.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Salaries => "Salários",
            ExpenseCategory::Rent => "Aluguel",
            ExpenseCategory::Electricity => "Energia Elétrica",
            ExpenseCategory::Water => "Água",
            ExpenseCategory::Gas => "Gás",
            ExpenseCategory::Phone => "Telefone/Internet",
            ExpenseCategory::Maintenance => "Manutenção",
            ExpenseCategory::Taxes => "Impostos",
            ExpenseCategory::Other => "Outros",
        }
    }
}

/// How an expense was paid. Only `Cash` leaves the register drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ExpensePaymentMethod {
    #[serde(rename = "dinheiro")]
    Cash,
    #[serde(rename = "cartao")]
    Card,
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "boleto")]
    Boleto,
    #[serde(rename = "transferencia")]
    Transfer,
}

/// An operating cost that is not a supplier purchase (rent, salaries, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    /// Day the cost applies to; may be backdated.
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Money,
    pub payment_method: ExpensePaymentMethod,
    #[serde(default)]
    pub supplier: Option<String>,
    /// Invoice or receipt number.
    #[serde(default)]
    pub reference: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Cash Register
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CashRegisterStatus {
    Open,
    Closed,
}

/// One drawer session, from opening float to counted close.
///
/// `expected_amount`, `actual_amount` and `difference` are filled in at
/// close; `difference = actual_amount - expected_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashRegister {
    pub id: String,
    pub responsible_user: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    pub initial_amount: Money,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expected_amount: Option<Money>,
    #[serde(default)]
    pub actual_amount: Option<Money>,
    #[serde(default)]
    pub difference: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: CashRegisterStatus,
}

impl CashRegister {
    pub fn is_open(&self) -> bool {
        self.status == CashRegisterStatus::Open
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
