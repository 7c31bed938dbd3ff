//! # Cash Register Commands
//!
//! ```text
//!   open_cash_register(initial)      ViewCashRegister, responsible = session user
//!          │
//!   current_cash_register()          live expected amount while open
//!          │
//!   close_cash_register(counted)     CloseCash, records the difference
//!          │
//!   cash_register_history(days)      closed and open sessions, newest first
//! ```

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::cash_register::cash_register_history as history_since;
use lanche_core::{CashCount, CashRegister, Money};

/// Default look-back for the history screen.
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Longest look-back `cash_register_history` accepts.
pub const MAX_HISTORY_DAYS: u32 = 366;

/// The open session plus what its drawer should hold right now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCashRegister {
    pub register: CashRegister,
    pub count: CashCount,
}

pub fn open_cash_register(
    coordinator: &Coordinator,
    session: &Session,
    initial_amount: Money,
) -> Result<CashRegister, ApiError> {
    debug!(initial = %initial_amount, "open_cash_register command");
    session.require(Permission::ViewCashRegister)?;

    coordinator.mutate(|state| state.open_cash_register(&session.name, initial_amount))
}

/// `None` when the drawer is closed.
pub fn current_cash_register(
    coordinator: &Coordinator,
    session: &Session,
) -> Result<Option<OpenCashRegister>, ApiError> {
    session.require(Permission::ViewCashRegister)?;

    let now = Utc::now();
    Ok(coordinator.read(|state| {
        state.current_cash_register().map(|register| OpenCashRegister {
            count: state.cash_count(register, now),
            register: register.clone(),
        })
    }))
}

pub fn close_cash_register(
    coordinator: &Coordinator,
    session: &Session,
    actual_amount: Money,
    notes: Option<String>,
) -> Result<CashRegister, ApiError> {
    debug!(actual = %actual_amount, "close_cash_register command");
    session.require(Permission::CloseCash)?;

    coordinator.mutate(|state| state.close_cash_register(actual_amount, notes))
}

/// Sessions opened in the last `days` days, newest first.
pub fn cash_register_history(
    coordinator: &Coordinator,
    session: &Session,
    days: u32,
) -> Result<Vec<CashRegister>, ApiError> {
    session.require(Permission::ViewCashRegister)?;
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(ApiError::validation(format!(
            "days must be between 1 and {}",
            MAX_HISTORY_DAYS
        )));
    }

    let since = Utc::now() - Duration::days(i64::from(days));
    Ok(coordinator.read(|state| history_since(state.cash_registers(), since)))
}
