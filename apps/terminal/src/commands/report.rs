//! # Report Commands
//!
//! Read-only views over the current state. Nothing here schedules a save.

use chrono::{NaiveDate, Utc};

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::report::{
    self, CategoryTotal, DailyFinancial, DailyTotal, DashboardMetrics, LowStockEntry,
    PaymentMethodTotal, ProductRevenue, ProductionCapacityEntry,
};

/// Longest window `daily_totals` and `daily_financials` will build.
pub const MAX_REPORT_DAYS: u32 = 366;

pub fn dashboard(coordinator: &Coordinator, session: &Session) -> Result<DashboardMetrics, ApiError> {
    session.require(Permission::ViewDashboard)?;
    Ok(coordinator.read(report::dashboard_metrics))
}

pub fn low_stock(coordinator: &Coordinator, session: &Session) -> Result<Vec<LowStockEntry>, ApiError> {
    session.require(Permission::ViewInventory)?;
    Ok(coordinator.read(|state| report::low_stock_report(state.products())))
}

pub fn production_capacity(
    coordinator: &Coordinator,
    session: &Session,
) -> Result<Vec<ProductionCapacityEntry>, ApiError> {
    session.require(Permission::ViewInventory)?;
    Ok(coordinator.read(|state| report::production_capacity(state.products())))
}

pub fn top_products(
    coordinator: &Coordinator,
    session: &Session,
    limit: usize,
) -> Result<Vec<ProductRevenue>, ApiError> {
    session.require(Permission::ViewReports)?;
    Ok(coordinator.read(|state| report::top_products(state.sales(), limit)))
}

pub fn sales_by_category(
    coordinator: &Coordinator,
    session: &Session,
) -> Result<Vec<CategoryTotal>, ApiError> {
    session.require(Permission::ViewReports)?;
    Ok(coordinator.read(|state| report::sales_by_category(state.sales(), state.products())))
}

pub fn sales_by_payment_method(
    coordinator: &Coordinator,
    session: &Session,
) -> Result<Vec<PaymentMethodTotal>, ApiError> {
    session.require(Permission::ViewReports)?;
    Ok(coordinator.read(|state| report::sales_by_payment_method(state.sales())))
}

/// Per-day totals for the last `days` days, ending today (UTC).
pub fn daily_totals(
    coordinator: &Coordinator,
    session: &Session,
    days: u32,
) -> Result<Vec<DailyTotal>, ApiError> {
    daily_totals_until(coordinator, session, Utc::now().date_naive(), days)
}

pub fn daily_totals_until(
    coordinator: &Coordinator,
    session: &Session,
    today: NaiveDate,
    days: u32,
) -> Result<Vec<DailyTotal>, ApiError> {
    session.require(Permission::ViewReports)?;
    check_report_days(days)?;
    Ok(coordinator.read(|state| report::daily_totals(state.sales(), today, days)))
}

/// Sales, purchases, expenses and net balance per day, ending today (UTC).
pub fn daily_financials(
    coordinator: &Coordinator,
    session: &Session,
    days: u32,
) -> Result<Vec<DailyFinancial>, ApiError> {
    daily_financials_until(coordinator, session, Utc::now().date_naive(), days)
}

pub fn daily_financials_until(
    coordinator: &Coordinator,
    session: &Session,
    today: NaiveDate,
    days: u32,
) -> Result<Vec<DailyFinancial>, ApiError> {
    session.require(Permission::ViewFinancial)?;
    check_report_days(days)?;
    Ok(coordinator.read(|state| {
        report::daily_financials(state.sales(), state.purchases(), state.expenses(), today, days)
    }))
}

fn check_report_days(days: u32) -> Result<(), ApiError> {
    if days == 0 || days > MAX_REPORT_DAYS {
        return Err(ApiError::validation(format!(
            "days must be between 1 and {}",
            MAX_REPORT_DAYS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::record_sale;
    use crate::error::ErrorCode;
    use crate::commands::expense::add_expense;
    use crate::testing::{admin, caixa, operador, scenario};
    use lanche_core::report::LowStockSeverity;
    use lanche_core::{
        ExpenseCategory, ExpenseInput, ExpensePaymentMethod, Money, PaymentMethod, Quantity,
        SaleRequest,
    };

    #[test]
    fn test_dashboard_after_sales() {
        let sc = scenario();
        for method in [PaymentMethod::Cash, PaymentMethod::Pix] {
            record_sale(&sc.coordinator, &caixa(), SaleRequest::new(vec![sc.dish_line(1)], method))
                .unwrap();
        }

        let metrics = dashboard(&sc.coordinator, &caixa()).unwrap();
        assert_eq!(metrics.sale_count, 2);
        assert_eq!(metrics.total_sales, Money::from_cents(3000));
        assert_eq!(metrics.average_ticket, Money::from_cents(1500));
        // 10 - 6 = 4 ≤ min 5
        assert_eq!(metrics.low_stock_count, 1);
    }

    #[test]
    fn test_oversold_ingredient_is_critical() {
        let sc = scenario();
        record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(vec![sc.dish_line(4)], PaymentMethod::Cash),
        )
        .unwrap();

        let entries = low_stock(&sc.coordinator, &operador()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stock, Quantity::from_int(-2));
        assert_eq!(entries[0].severity, LowStockSeverity::Critical);

        let capacity = production_capacity(&sc.coordinator, &operador()).unwrap();
        assert_eq!(capacity[0].units, Quantity::zero());
        assert_eq!(capacity[0].bottleneck_id.as_deref(), Some(sc.ingredient_id.as_str()));
    }

    #[test]
    fn test_sales_reports() {
        let sc = scenario();
        record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(vec![sc.dish_line(2)], PaymentMethod::Pix),
        )
        .unwrap();

        let top = top_products(&sc.coordinator, &operador(), 5).unwrap();
        assert_eq!(top[0].product_id, sc.dish_id);
        assert_eq!(top[0].revenue, Money::from_cents(3000));

        let categories = sales_by_category(&sc.coordinator, &operador()).unwrap();
        assert_eq!(categories[0].category, "Lanches");

        let by_method = sales_by_payment_method(&sc.coordinator, &operador()).unwrap();
        let pix = by_method.iter().find(|m| m.method == PaymentMethod::Pix).unwrap();
        assert_eq!(pix.count, 1);

        let days = daily_totals(&sc.coordinator, &operador(), 7).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days.last().unwrap().total, Money::from_cents(3000));
    }

    #[test]
    fn test_report_guards() {
        let sc = scenario();
        assert_eq!(
            top_products(&sc.coordinator, &caixa(), 5).unwrap_err().code,
            ErrorCode::Forbidden
        );
        assert_eq!(
            daily_totals(&sc.coordinator, &operador(), 0).unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_daily_financials_subtract_expenses() {
        let sc = scenario();
        let today = Utc::now().date_naive();
        record_sale(
            &sc.coordinator,
            &caixa(),
            SaleRequest::new(vec![sc.dish_line(2)], PaymentMethod::Pix),
        )
        .unwrap();
        add_expense(
            &sc.coordinator,
            &admin(),
            ExpenseInput {
                date: today,
                category: ExpenseCategory::Electricity,
                description: "Conta de luz".to_string(),
                amount: Money::from_cents(5_000),
                payment_method: ExpensePaymentMethod::Pix,
                supplier: None,
                reference: None,
            },
        )
        .unwrap();

        let days = daily_financials_until(&sc.coordinator, &admin(), today, 2).unwrap();
        assert_eq!(days.len(), 2);
        assert!(days[0].net_balance.is_zero());
        assert_eq!(days[1].total_sales, Money::from_cents(3000));
        assert_eq!(days[1].total_expenses, Money::from_cents(5_000));
        assert_eq!(days[1].net_balance, Money::from_cents(-2_000));

        assert_eq!(
            daily_financials(&sc.coordinator, &operador(), 7).unwrap_err().code,
            ErrorCode::Forbidden
        );
    }
}
