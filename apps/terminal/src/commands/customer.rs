//! # Customer Commands
//!
//! Registration, edits, loyalty lookup, purchase history and two-phase removal.
//!
//! ```text
//!   propose_customer_removal(id) ──► RemovalToken ──► shown to the user
//!                                          │
//!                 confirm ─────────────────┼──────────────── cancel
//!                    ▼                                         ▼
//!   commit_customer_removal(token)            cancel_customer_removal(token)
//! ```

use serde::Serialize;
use tracing::debug;

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::loyalty::{available_rewards, next_reward, RewardTier};
use lanche_core::report::{customer_history as history_of, CustomerHistory};
use lanche_core::{Customer, CustomerInput, RemovalToken};

/// Loyalty standing of one customer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRewards {
    pub customer_id: String,
    pub points: i64,
    pub available: Vec<RewardTier>,
    pub next: Option<RewardTier>,
}

pub fn list_customers(coordinator: &Coordinator, session: &Session) -> Result<Vec<Customer>, ApiError> {
    session.require(Permission::ViewPos)?;
    Ok(coordinator.read(|state| state.customers().to_vec()))
}

pub fn add_customer(
    coordinator: &Coordinator,
    session: &Session,
    input: CustomerInput,
) -> Result<Customer, ApiError> {
    debug!("add_customer command");
    session.require(Permission::ViewPos)?;

    coordinator.mutate(|state| state.add_customer(input))
}

pub fn update_customer(
    coordinator: &Coordinator,
    session: &Session,
    customer_id: &str,
    input: CustomerInput,
) -> Result<Customer, ApiError> {
    debug!(customer_id = %customer_id, "update_customer command");
    session.require(Permission::ViewPos)?;

    coordinator.mutate(|state| state.update_customer(customer_id, input))
}

pub fn customer_rewards(
    coordinator: &Coordinator,
    session: &Session,
    customer_id: &str,
) -> Result<CustomerRewards, ApiError> {
    session.require(Permission::ViewPos)?;

    let points = coordinator
        .read(|state| state.customer(customer_id).map(|c| c.loyalty_points))
        .ok_or_else(|| ApiError::not_found("Customer", customer_id))?;

    Ok(CustomerRewards {
        customer_id: customer_id.to_string(),
        points,
        available: available_rewards(points),
        next: next_reward(points),
    })
}

/// Sales, spend and favourite products of one customer.
pub fn customer_history(
    coordinator: &Coordinator,
    session: &Session,
    customer_id: &str,
) -> Result<CustomerHistory, ApiError> {
    session.require(Permission::ViewPos)?;

    coordinator
        .read(|state| {
            state
                .customer(customer_id)
                .map(|customer| history_of(customer, state.sales()))
        })
        .ok_or_else(|| ApiError::not_found("Customer", customer_id))
}

pub fn propose_customer_removal(
    coordinator: &Coordinator,
    session: &Session,
    customer_id: &str,
) -> Result<RemovalToken, ApiError> {
    debug!(customer_id = %customer_id, "propose_customer_removal command");
    session.require(Permission::DeleteItems)?;

    coordinator.mutate(|state| state.propose_customer_removal(customer_id))
}

pub fn commit_customer_removal(
    coordinator: &Coordinator,
    session: &Session,
    token: &RemovalToken,
) -> Result<Customer, ApiError> {
    debug!(customer_id = %token.customer_id, "commit_customer_removal command");
    session.require(Permission::DeleteItems)?;

    coordinator.mutate(|state| state.commit_customer_removal(token))
}

/// Returns false when the token was already used or never issued.
pub fn cancel_customer_removal(
    coordinator: &Coordinator,
    session: &Session,
    token: &RemovalToken,
) -> Result<bool, ApiError> {
    session.require(Permission::DeleteItems)?;
    coordinator.mutate(|state| Ok(state.cancel_customer_removal(token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::record_sale;
    use crate::error::ErrorCode;
    use crate::testing::{admin, caixa, scenario};
    use lanche_core::{PaymentMethod, SaleRequest};

    fn maria() -> CustomerInput {
        CustomerInput {
            first_name: "Maria".to_string(),
            last_name: "Souza".to_string(),
            phone: "11999990000".to_string(),
            email: None,
        }
    }

    #[test]
    fn test_sale_earns_points() {
        let sc = scenario();
        let customer = add_customer(&sc.coordinator, &caixa(), maria()).unwrap();

        let sale = record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(vec![sc.dish_line(2)], PaymentMethod::Cash).with_customer(&customer.id),
        )
        .unwrap();
        assert_eq!(sale.customer_name.as_deref(), Some("Maria Souza"));

        let rewards = customer_rewards(&sc.coordinator, &caixa(), &customer.id).unwrap();
        assert_eq!(rewards.points, 3);
        assert!(rewards.available.is_empty());
        assert_eq!(rewards.next.map(|t| t.points), Some(50));
    }

    #[test]
    fn test_history_lists_customer_sales() {
        let sc = scenario();
        let customer = add_customer(&sc.coordinator, &caixa(), maria()).unwrap();
        for method in [PaymentMethod::Cash, PaymentMethod::Pix] {
            record_sale(
                &sc.coordinator,
                &caixa(),
                SaleRequest::new(vec![sc.dish_line(1)], method).with_customer(&customer.id),
            )
            .unwrap();
        }
        record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(vec![sc.dish_line(1)], PaymentMethod::Cash),
        )
        .unwrap();

        let history = customer_history(&sc.coordinator, &caixa(), &customer.id).unwrap();
        assert_eq!(history.sale_count, 2);
        assert_eq!(history.total_spent.cents(), 3000);
        assert_eq!(history.favorite_products.len(), 1);
        assert_eq!(history.favorite_products[0].product_id, sc.dish_id);
        assert_eq!(history.loyalty_points, 2);

        assert_eq!(
            customer_history(&sc.coordinator, &caixa(), "ghost").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_two_phase_removal() {
        let sc = scenario();
        let customer = add_customer(&sc.coordinator, &caixa(), maria()).unwrap();

        let token = propose_customer_removal(&sc.coordinator, &admin(), &customer.id).unwrap();
        assert_eq!(token.customer_name, "Maria Souza");
        assert_eq!(list_customers(&sc.coordinator, &caixa()).unwrap().len(), 1);

        commit_customer_removal(&sc.coordinator, &admin(), &token).unwrap();
        assert!(list_customers(&sc.coordinator, &caixa()).unwrap().is_empty());

        let err = commit_customer_removal(&sc.coordinator, &admin(), &token).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_cancelled_removal_keeps_customer() {
        let sc = scenario();
        let customer = add_customer(&sc.coordinator, &caixa(), maria()).unwrap();
        let token = propose_customer_removal(&sc.coordinator, &admin(), &customer.id).unwrap();

        assert!(cancel_customer_removal(&sc.coordinator, &admin(), &token).unwrap());
        assert!(!cancel_customer_removal(&sc.coordinator, &admin(), &token).unwrap());
        assert!(commit_customer_removal(&sc.coordinator, &admin(), &token).is_err());
        assert_eq!(list_customers(&sc.coordinator, &caixa()).unwrap().len(), 1);
    }

    #[test]
    fn test_caixa_cannot_remove_customers() {
        let sc = scenario();
        let customer = add_customer(&sc.coordinator, &caixa(), maria()).unwrap();
        let err = propose_customer_removal(&sc.coordinator, &caixa(), &customer.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_update_and_unknown_rewards() {
        let sc = scenario();
        let customer = add_customer(&sc.coordinator, &caixa(), maria()).unwrap();
        let mut input = maria();
        input.phone = "11888880000".to_string();

        let updated = update_customer(&sc.coordinator, &caixa(), &customer.id, input).unwrap();
        assert_eq!(updated.phone, "11888880000");
        assert_eq!(
            customer_rewards(&sc.coordinator, &caixa(), "ghost").unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
