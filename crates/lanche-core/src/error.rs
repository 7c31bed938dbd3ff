//! # Error Types
//!
//! Domain-specific error types for lanche-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lanche-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  lanche-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Terminal API errors (in app)                                          │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Presentation           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - Negative stock after a sale (allowed unless `StockPolicy::RejectNegative`)
//! - Unknown product ids inside a recipe or purchase (skipped with a warning)
//! - Updating or closing a comanda that no longer exists (`Ok(None)`)

use thiserror::Error;

use crate::quantity::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every operation validates before it mutates, so returning one of these
/// guarantees the state was left untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Supplier cannot be found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Shopping list entry cannot be found.
    #[error("Shopping list item not found: {0}")]
    ShoppingListItemNotFound(String),

    /// Selling would drive an ingredient below zero while the terminal
    /// runs with `StockPolicy::RejectNegative`.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell 3 × X-Burger (0.150 kg beef each)
    ///      │
    ///      ▼
    /// Plan deltas: beef -0.450
    ///      │
    ///      ▼
    /// beef on hand 0.300 → InsufficientStock { product: "Carne", ... }
    ///      │
    ///      ▼
    /// UI shows: "Only 0.3 Carne in stock"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, required {required}")]
    InsufficientStock {
        product: String,
        available: Quantity,
        required: Quantity,
    },

    /// The product is not an ingredient but the operation needs one.
    #[error("{0} is not an ingredient")]
    NotAnIngredient(String),

    /// Dish recipe references something other than an existing ingredient.
    #[error("Invalid recipe for {dish}: {reason}")]
    InvalidRecipe { dish: String, reason: String },

    /// An ingredient cannot become a dish while recipes still use it.
    #[error("{ingredient} is used in the recipe of {dishes}")]
    IngredientInUse { ingredient: String, dishes: String },

    /// Expense cannot be found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    /// A cash register session is already open.
    #[error("Cash register is already open since {0}")]
    CashRegisterAlreadyOpen(String),

    /// Closing needs an open cash register session.
    #[error("No cash register is open")]
    CashRegisterNotOpen,

    /// Removal token does not match a pending removal.
    #[error("Removal token is stale or unknown")]
    StaleRemovalToken,

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., product id already in the catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
