//! # Purchase Commands

use tracing::debug;

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::{Purchase, PurchaseRequest};

pub fn record_purchase(
    coordinator: &Coordinator,
    session: &Session,
    request: PurchaseRequest,
) -> Result<Purchase, ApiError> {
    debug!(supplier_id = %request.supplier_id, items = request.items.len(), "record_purchase command");
    session.require(Permission::ViewPurchases)?;

    coordinator.mutate(|state| state.record_purchase(request))
}

pub fn list_purchases(coordinator: &Coordinator, session: &Session) -> Result<Vec<Purchase>, ApiError> {
    session.require(Permission::ViewPurchases)?;
    Ok(coordinator.read(|state| state.purchases().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{caixa, operador, scenario};
    use lanche_core::{LineItem, Money, Quantity};

    fn restock(ingredient_id: &str, supplier_id: &str, qty: i64) -> PurchaseRequest {
        PurchaseRequest {
            supplier_id: supplier_id.to_string(),
            items: vec![LineItem::new(ingredient_id, "A", Quantity::from_int(qty), Money::from_cents(150))],
        }
    }

    #[test]
    fn test_purchase_raises_stock() {
        let sc = scenario();
        let supplier = sc.add_supplier();

        let purchase =
            record_purchase(&sc.coordinator, &operador(), restock(&sc.ingredient_id, &supplier, 6)).unwrap();

        assert_eq!(purchase.total, Money::from_cents(900));
        sc.coordinator.read(|s| {
            assert_eq!(s.products().get(&sc.ingredient_id).unwrap().stock, Quantity::from_int(16));
            assert_eq!(s.availability(&sc.dish_id), Some(Quantity::from_int(5)));
        });
        assert_eq!(list_purchases(&sc.coordinator, &operador()).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_supplier_rejected() {
        let sc = scenario();
        let err = record_purchase(&sc.coordinator, &operador(), restock(&sc.ingredient_id, "ghost", 1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_caixa_cannot_purchase() {
        let sc = scenario();
        let supplier = sc.add_supplier();
        let err = record_purchase(&sc.coordinator, &caixa(), restock(&sc.ingredient_id, &supplier, 1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
