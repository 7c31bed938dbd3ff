//! # Customers & Suppliers
//!
//! Maintenance operations for the people the lanchonete deals with.
//!
//! ## Two-Phase Customer Removal
//! ```text
//! propose_customer_removal(id) ──► RemovalToken { token, customer_name }
//!                                        │
//!                    UI asks "Remover Ana Silva?"
//!                                        │
//!              ┌─────────────────────────┴────────────────────────┐
//!              ▼                                                  ▼
//! commit_customer_removal(token)                    cancel_customer_removal(token)
//!   customer deleted                                   nothing changes
//! ```
//!
//! Loyalty points are never edited here; only the sale engine moves them.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::state::AppState;
use crate::types::{Customer, Supplier};
use crate::validation::{validate_email, validate_text};

/// Editable customer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInput {
    #[serde(rename = "nome")]
    pub first_name: String,
    #[serde(rename = "sobrenome", default)]
    pub last_name: String,
    #[serde(rename = "fone")]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Editable supplier fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierInput {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
}

/// Proof that a removal was proposed; hand it back to commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RemovalToken {
    pub token: String,
    pub customer_id: String,
    /// Shown in the confirmation prompt.
    pub customer_name: String,
}

struct CleanCustomer {
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
}

fn clean_customer(input: CustomerInput) -> CoreResult<CleanCustomer> {
    Ok(CleanCustomer {
        first_name: validate_text("nome", &input.first_name, 100)?,
        last_name: input.last_name.trim().to_string(),
        phone: validate_text("fone", &input.phone, 30)?,
        email: validate_email(input.email.as_deref())?,
    })
}

impl AppState {
    pub fn add_customer(&mut self, input: CustomerInput) -> CoreResult<Customer> {
        let clean = clean_customer(input)?;
        let now = Utc::now();

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            first_name: clean.first_name,
            last_name: clean.last_name,
            phone: clean.phone,
            email: clean.email,
            loyalty_points: 0,
            created_at: now,
            updated_at: now,
        };

        self.customers.push(customer.clone());
        info!(customer_id = %customer.id, "Customer added");
        Ok(customer)
    }

    /// Updates contact fields; points and `created_at` are kept.
    pub fn update_customer(&mut self, id: &str, input: CustomerInput) -> CoreResult<Customer> {
        let clean = clean_customer(input)?;
        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;

        customer.first_name = clean.first_name;
        customer.last_name = clean.last_name;
        customer.phone = clean.phone;
        customer.email = clean.email;
        customer.updated_at = Utc::now();

        info!(customer_id = %id, "Customer updated");
        Ok(customer.clone())
    }

    /// First phase of removal. Nothing is deleted yet.
    pub fn propose_customer_removal(&mut self, id: &str) -> CoreResult<RemovalToken> {
        let customer = self
            .customer(id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;

        let token = RemovalToken {
            token: Uuid::new_v4().to_string(),
            customer_id: customer.id.clone(),
            customer_name: customer.full_name(),
        };
        self.pending_removals
            .insert(token.token.clone(), token.customer_id.clone());
        Ok(token)
    }

    /// Second phase: deletes the customer the token was issued for.
    pub fn commit_customer_removal(&mut self, token: &RemovalToken) -> CoreResult<Customer> {
        match self.pending_removals.get(&token.token) {
            Some(id) if *id == token.customer_id => {}
            _ => return Err(CoreError::StaleRemovalToken),
        }
        self.pending_removals.remove(&token.token);

        let index = self
            .customers
            .iter()
            .position(|c| c.id == token.customer_id)
            .ok_or_else(|| CoreError::CustomerNotFound(token.customer_id.clone()))?;

        let removed = self.customers.remove(index);
        info!(customer_id = %removed.id, "Customer removed");
        Ok(removed)
    }

    /// Drops a pending removal. Returns false when the token was unknown.
    pub fn cancel_customer_removal(&mut self, token: &RemovalToken) -> bool {
        self.pending_removals.remove(&token.token).is_some()
    }

    pub fn add_supplier(&mut self, input: SupplierInput) -> CoreResult<Supplier> {
        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: validate_text("name", &input.name, 200)?,
            contact: input.contact.trim().to_string(),
            email: validate_email(Some(&input.email))?.unwrap_or_default(),
        };

        self.suppliers.push(supplier.clone());
        info!(supplier_id = %supplier.id, name = %supplier.name, "Supplier added");
        Ok(supplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::new_customer;

    #[test]
    fn test_add_customer_starts_with_zero_points() {
        let mut state = AppState::new();
        let customer = state.add_customer(new_customer("Ana")).unwrap();
        assert_eq!(customer.loyalty_points, 0);
        assert_eq!(state.customers().len(), 1);
    }

    #[test]
    fn test_add_customer_requires_name_and_phone() {
        let mut state = AppState::new();

        let mut input = new_customer("Ana");
        input.first_name = " ".to_string();
        assert!(state.add_customer(input).is_err());

        let mut input = new_customer("Ana");
        input.phone = String::new();
        assert!(state.add_customer(input).is_err());

        assert!(state.customers().is_empty());
    }

    #[test]
    fn test_update_customer_keeps_points() {
        let mut state = AppState::new();
        let customer = state.add_customer(new_customer("Ana")).unwrap();
        state.customers[0].loyalty_points = 40;

        let mut input = new_customer("Ana Maria");
        input.email = Some("ana@lanche.com.br".to_string());
        let updated = state.update_customer(&customer.id, input).unwrap();

        assert_eq!(updated.first_name, "Ana Maria");
        assert_eq!(updated.loyalty_points, 40);
        assert_eq!(updated.created_at, customer.created_at);
    }

    #[test]
    fn test_two_phase_removal() {
        let mut state = AppState::new();
        let customer = state.add_customer(new_customer("Ana")).unwrap();

        let token = state.propose_customer_removal(&customer.id).unwrap();
        assert_eq!(token.customer_name, "Ana Silva");
        assert_eq!(state.customers().len(), 1);

        let removed = state.commit_customer_removal(&token).unwrap();
        assert_eq!(removed.id, customer.id);
        assert!(state.customers().is_empty());

        // a token is single-use
        assert!(matches!(
            state.commit_customer_removal(&token),
            Err(CoreError::StaleRemovalToken)
        ));
    }

    #[test]
    fn test_cancelled_removal_cannot_commit() {
        let mut state = AppState::new();
        let customer = state.add_customer(new_customer("Ana")).unwrap();

        let token = state.propose_customer_removal(&customer.id).unwrap();
        assert!(state.cancel_customer_removal(&token));
        assert!(state.commit_customer_removal(&token).is_err());
        assert_eq!(state.customers().len(), 1);
    }

    #[test]
    fn test_forged_token_rejected() {
        let mut state = AppState::new();
        let ana = state.add_customer(new_customer("Ana")).unwrap();
        let bia = state.add_customer(new_customer("Bia")).unwrap();

        let mut token = state.propose_customer_removal(&ana.id).unwrap();
        token.customer_id = bia.id.clone();

        assert!(state.commit_customer_removal(&token).is_err());
        assert_eq!(state.customers().len(), 2);
    }

    #[test]
    fn test_add_supplier() {
        let mut state = AppState::new();
        let supplier = state
            .add_supplier(SupplierInput {
                name: "Atacadão".to_string(),
                contact: "Carlos".to_string(),
                email: String::new(),
            })
            .unwrap();

        assert_eq!(state.supplier(&supplier.id).unwrap().name, "Atacadão");

        let bad = SupplierInput {
            name: "X".to_string(),
            contact: String::new(),
            email: "not-an-email".to_string(),
        };
        assert!(state.add_supplier(bad).is_err());
    }
}
