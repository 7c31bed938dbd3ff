//! # Sale Commands

use serde::Serialize;
use tracing::{debug, info};

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::sale::price_sale;
use lanche_core::validation::{validate_discount_percent, validate_line_items};
use lanche_core::{LineItem, Money, Sale, SaleRequest};

/// Totals shown before the sale is confirmed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleQuote {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub points_earned: i64,
}

/// Prices a cart without recording anything.
pub fn quote_sale(
    session: &Session,
    items: &[LineItem],
    discount_percent: Option<u32>,
) -> Result<SaleQuote, ApiError> {
    session.require(Permission::ViewPos)?;
    validate_line_items(items)?;
    if let Some(percent) = discount_percent {
        validate_discount_percent(percent)?;
    }

    let totals = price_sale(items, discount_percent);
    Ok(SaleQuote {
        subtotal: totals.subtotal,
        discount: totals.discount,
        total: totals.total,
        points_earned: totals.points_earned,
    })
}

pub fn record_sale(
    coordinator: &Coordinator,
    session: &Session,
    request: SaleRequest,
) -> Result<Sale, ApiError> {
    debug!(
        items = request.items.len(),
        method = request.payment_method.as_str(),
        "record_sale command"
    );
    session.require(Permission::ViewPos)?;

    let sale = coordinator.mutate(|state| state.record_sale(request))?;

    info!(sale_id = %sale.id, total = %sale.total, user = %session.user_id, "Sale recorded at terminal");
    Ok(sale)
}

pub fn list_sales(coordinator: &Coordinator, session: &Session) -> Result<Vec<Sale>, ApiError> {
    session.require(Permission::ViewReports)?;
    Ok(coordinator.read(|state| state.sales().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{caixa, operador, scenario};
    use lanche_core::{PaymentMethod, Quantity, StockPolicy};

    #[test]
    fn test_quote_matches_recorded_sale() {
        let sc = scenario();
        let items = vec![sc.dish_line(2)];

        let quote = quote_sale(&caixa(), &items, Some(10)).unwrap();
        let sale = record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(items, PaymentMethod::Cash).with_discount(10),
        )
        .unwrap();

        assert_eq!(quote.subtotal, sale.subtotal);
        assert_eq!(quote.discount, sale.discount);
        assert_eq!(quote.total, sale.total);
        assert_eq!(quote.points_earned, sale.loyalty_points_earned);
    }

    #[test]
    fn test_quote_rejects_bad_discount() {
        let sc = scenario();
        let err = quote_sale(&caixa(), &[sc.dish_line(1)], Some(150)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_sale_deducts_recipe_stock() {
        let sc = scenario();
        let sale = record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(vec![sc.dish_line(2)], PaymentMethod::Pix),
        )
        .unwrap();

        assert_eq!(sale.total, Money::from_cents(3000));
        sc.coordinator.read(|s| {
            assert_eq!(s.products().get(&sc.ingredient_id).unwrap().stock, Quantity::from_int(4));
            assert_eq!(s.availability(&sc.dish_id), Some(Quantity::from_int(1)));
        });
    }

    #[test]
    fn test_rejected_oversell_leaves_state_untouched() {
        let sc = scenario();
        sc.coordinator
            .mutate(|s| {
                s.set_stock_policy(StockPolicy::RejectNegative);
                Ok(())
            })
            .unwrap();
        let revision = sc.coordinator.revision();

        let err = record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(vec![sc.dish_line(4)], PaymentMethod::Card),
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(sc.coordinator.revision(), revision);
        assert!(sc.coordinator.read(|s| s.sales().is_empty()));
    }

    #[test]
    fn test_caixa_cannot_list_sales() {
        let sc = scenario();
        assert_eq!(
            list_sales(&sc.coordinator, &caixa()).unwrap_err().code,
            ErrorCode::Forbidden
        );
        assert!(list_sales(&sc.coordinator, &operador()).unwrap().is_empty());
    }
}
