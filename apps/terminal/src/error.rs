//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Lanche POS                             │
//! │                                                                         │
//! │  commands::sale::record_sale(&coordinator, &session, request)          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Permission missing? ─── ApiError::forbidden ─────────────────► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Core rejects? ─── CoreError::InsufficientStock ── ApiError ───► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──► state mutated, snapshot saved in the background ──► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Background save failure never reaches the caller: it is logged.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ApiError` serializes to `{ "code": "NOT_FOUND", "message": "..." }` so a
//! presentation layer can branch on `code` and display `message`.

use serde::Serialize;
use lanche_core::{CoreError, ValidationError};
use lanche_db::DbError;

/// API error returned from terminal commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Pão: available 1, required 3"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Session role lacks the permission (403)
    Forbidden,

    /// Database operation failed (500)
    DatabaseError,

    /// Business rule refused the operation (422)
    BusinessLogic,

    /// Internal error (500)
    Internal,

    /// Cart operation failed
    CartError,

    /// Sale refused under the reject-oversell policy
    InsufficientStock,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConstraintViolation { message } => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid data")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::MalformedDocument { concern, message } => {
                tracing::error!(concern = %concern, "Malformed stored document: {}", message);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Stored data for {} could not be read", concern),
                )
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::CustomerNotFound(id) => ApiError::not_found("Customer", &id),
            CoreError::SupplierNotFound(id) => ApiError::not_found("Supplier", &id),
            CoreError::ShoppingListItemNotFound(id) => {
                ApiError::not_found("Shopping list item", &id)
            }
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ CoreError::CartTooLarge { .. } => ApiError::new(ErrorCode::CartError, e.to_string()),
            CoreError::ExpenseNotFound(id) => ApiError::not_found("Expense", &id),
            e @ CoreError::InvalidRecipe { .. } => ApiError::validation(e.to_string()),
            e @ (CoreError::NotAnIngredient(_)
            | CoreError::IngredientInUse { .. }
            | CoreError::CashRegisterAlreadyOpen(_)
            | CoreError::CashRegisterNotOpen
            | CoreError::StaleRemovalToken) => {
                ApiError::new(ErrorCode::BusinessLogic, e.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use lanche_core::Quantity;

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::not_found("Product", "abc");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: abc");
    }

    #[test]
    fn test_core_error_codes() {
        let stock = CoreError::InsufficientStock {
            product: "Pão".to_string(),
            available: Quantity::from_int(1),
            required: Quantity::from_int(3),
        };
        assert_eq!(ApiError::from(stock).code, ErrorCode::InsufficientStock);
        assert_eq!(
            ApiError::from(CoreError::StaleRemovalToken).code,
            ErrorCode::BusinessLogic
        );
        assert_eq!(
            ApiError::from(CoreError::CartTooLarge { max: 100 }).code,
            ErrorCode::CartError
        );

        let validation = CoreError::from(ValidationError::Required {
            field: "name".to_string(),
        });
        let api = ApiError::from(validation);
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.message, "name is required");
    }

    #[test]
    fn test_db_error_codes() {
        assert_eq!(
            ApiError::from(DbError::PoolExhausted).code,
            ErrorCode::DatabaseError
        );
        let api = ApiError::from(DbError::malformed("sales", "bad"));
        assert_eq!(api.message, "Stored data for sales could not be read");
    }
}
