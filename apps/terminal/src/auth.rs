//! # Roles & Permissions
//!
//! Static role → permission table and the session every command receives.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │ Role         │ Permissions                                              │
//! ├──────────────┼──────────────────────────────────────────────────────────┤
//! │ admin        │ everything                                               │
//! │ operador     │ dashboard, pos, inventory, shopping list, purchases,     │
//! │              │ manage products, reports                                 │
//! │ caixa        │ pos, cash register, close cash, dashboard                │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```
//!
//! Login itself is out of scope: whoever builds a [`Session`] has already
//! authenticated the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;

/// A user's role at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operador,
    Caixa,
}

/// Gate checked by every command before it touches state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    ViewPos,
    ViewInventory,
    ViewShoppingList,
    ViewPurchases,
    ViewFinancial,
    ViewExpenses,
    ViewCashRegister,
    ViewReports,
    ManageProducts,
    ManageSuppliers,
    CloseCash,
    DeleteItems,
}

const ADMIN: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewPos,
    Permission::ViewInventory,
    Permission::ViewShoppingList,
    Permission::ViewPurchases,
    Permission::ViewFinancial,
    Permission::ViewExpenses,
    Permission::ViewCashRegister,
    Permission::ViewReports,
    Permission::ManageProducts,
    Permission::ManageSuppliers,
    Permission::CloseCash,
    Permission::DeleteItems,
];

const OPERADOR: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewPos,
    Permission::ViewInventory,
    Permission::ViewShoppingList,
    Permission::ViewPurchases,
    Permission::ManageProducts,
    Permission::ViewReports,
];

const CAIXA: &[Permission] = &[
    Permission::ViewPos,
    Permission::ViewCashRegister,
    Permission::CloseCash,
    Permission::ViewDashboard,
];

impl Role {
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Admin => ADMIN,
            Role::Operador => OPERADOR,
            Role::Caixa => CAIXA,
        }
    }

    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

/// An authenticated user at this terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub login_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Session {
            user_id: user_id.into(),
            name: name.into(),
            role,
            login_at: Utc::now(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }

    /// Fails with `FORBIDDEN` unless the session's role grants `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if self.has_permission(permission) {
            return Ok(());
        }
        warn!(
            user = %self.user_id,
            role = ?self.role,
            ?permission,
            "Permission denied"
        );
        Err(ApiError::forbidden(format!(
            "{} may not perform this action",
            self.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_admin_has_everything() {
        for permission in ADMIN {
            assert!(Role::Admin.allows(*permission));
        }
        assert!(OPERADOR.iter().all(|p| Role::Admin.allows(*p)));
        assert!(CAIXA.iter().all(|p| Role::Admin.allows(*p)));
    }

    #[test]
    fn test_caixa_cannot_manage_products() {
        let session = Session::new("u2", "Ana", Role::Caixa);
        assert!(session.has_permission(Permission::ViewPos));
        assert!(!session.has_permission(Permission::ManageProducts));
        assert_eq!(
            session.require(Permission::ManageProducts).unwrap_err().code,
            ErrorCode::Forbidden
        );
    }

    #[test]
    fn test_operador_permissions() {
        assert!(Role::Operador.allows(Permission::ViewShoppingList));
        assert!(Role::Operador.allows(Permission::ManageProducts));
        assert!(!Role::Operador.allows(Permission::ManageSuppliers));
        assert!(!Role::Operador.allows(Permission::CloseCash));
        assert!(!Role::Operador.allows(Permission::ViewExpenses));
        assert!(Role::Caixa.allows(Permission::CloseCash));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Operador).unwrap(), "\"operador\"");
        let role: Role = serde_json::from_str("\"caixa\"").unwrap();
        assert_eq!(role, Role::Caixa);
    }
}
