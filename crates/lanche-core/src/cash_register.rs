//! # Cash Register
//!
//! Drawer sessions: open with a float, close with a counted amount.
//!
//! ```text
//! open_cash_register("Ana", R$ 100,00)
//!      │
//!      │   cash sales      +
//!      │   cash expenses   -      (created while the drawer is open)
//!      ▼
//! close_cash_register(counted)
//!      expected   = initial + cash sales - cash expenses
//!      difference = counted - expected       (negative = missing cash)
//! ```
//!
//! At most one session is open at a time. Card and pix sales never touch
//! the drawer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::state::AppState;
use crate::types::{CashRegister, CashRegisterStatus, ExpensePaymentMethod, PaymentMethod};
use crate::validation::{optional_text, validate_price, validate_text};

/// What the drawer should hold at a given moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashCount {
    pub initial_amount: Money,
    pub cash_sales: Money,
    pub cash_sale_count: usize,
    pub cash_expenses: Money,
    pub expected_amount: Money,
}

impl AppState {
    pub fn cash_registers(&self) -> &[CashRegister] {
        &self.cash_registers
    }

    pub fn current_cash_register(&self) -> Option<&CashRegister> {
        self.cash_registers.iter().find(|r| r.is_open())
    }

    /// Cash movements between `register.opened_at` and `until`, both inclusive.
    pub fn cash_count(&self, register: &CashRegister, until: DateTime<Utc>) -> CashCount {
        let in_window = |at: DateTime<Utc>| at >= register.opened_at && at <= until;

        let cash_sales = self
            .sales
            .iter()
            .filter(|s| s.payment_method == PaymentMethod::Cash && in_window(s.date));
        let cash_sale_count = cash_sales.clone().count();
        let cash_sales: Money = cash_sales.map(|s| s.total).sum();

        let cash_expenses: Money = self
            .expenses
            .iter()
            .filter(|e| e.payment_method == ExpensePaymentMethod::Cash && in_window(e.created_at))
            .map(|e| e.amount)
            .sum();

        CashCount {
            initial_amount: register.initial_amount,
            cash_sales,
            cash_sale_count,
            cash_expenses,
            expected_amount: register.initial_amount + cash_sales - cash_expenses,
        }
    }

    pub fn open_cash_register(
        &mut self,
        responsible_user: &str,
        initial_amount: Money,
    ) -> CoreResult<CashRegister> {
        if let Some(open) = self.current_cash_register() {
            return Err(CoreError::CashRegisterAlreadyOpen(
                open.opened_at.to_rfc3339(),
            ));
        }
        let responsible_user = validate_text("responsible user", responsible_user, 100)?;
        validate_price("initial amount", initial_amount)?;

        let register = CashRegister {
            id: Uuid::new_v4().to_string(),
            responsible_user,
            opened_at: Utc::now(),
            initial_amount,
            closed_at: None,
            expected_amount: None,
            actual_amount: None,
            difference: None,
            notes: None,
            status: CashRegisterStatus::Open,
        };

        self.cash_registers.push(register.clone());
        info!(
            register_id = %register.id,
            user = %register.responsible_user,
            initial = %register.initial_amount,
            "Cash register opened"
        );
        Ok(register)
    }

    /// Closes the open session against the counted `actual_amount`.
    pub fn close_cash_register(
        &mut self,
        actual_amount: Money,
        notes: Option<String>,
    ) -> CoreResult<CashRegister> {
        validate_price("actual amount", actual_amount)?;
        let index = self
            .cash_registers
            .iter()
            .position(CashRegister::is_open)
            .ok_or(CoreError::CashRegisterNotOpen)?;

        let closed_at = Utc::now();
        let count = self.cash_count(&self.cash_registers[index], closed_at);
        let difference = actual_amount - count.expected_amount;

        let register = &mut self.cash_registers[index];
        register.closed_at = Some(closed_at);
        register.expected_amount = Some(count.expected_amount);
        register.actual_amount = Some(actual_amount);
        register.difference = Some(difference);
        register.notes = optional_text(notes);
        register.status = CashRegisterStatus::Closed;

        if difference.is_zero() {
            info!(register_id = %register.id, expected = %count.expected_amount, "Cash register closed");
        } else {
            warn!(
                register_id = %register.id,
                expected = %count.expected_amount,
                actual = %actual_amount,
                difference = %difference,
                "Cash register closed with a difference"
            );
        }
        Ok(register.clone())
    }
}

/// Sessions opened at or after `since`, newest first.
pub fn cash_register_history(registers: &[CashRegister], since: DateTime<Utc>) -> Vec<CashRegister> {
    let mut recent: Vec<CashRegister> = registers
        .iter()
        .filter(|r| r.opened_at >= since)
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
    recent
}

// =============================================================================
// Unit Tests
// =============================================================================
