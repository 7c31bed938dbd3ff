//! # Expense Commands
//!
//! Operating costs: list with filters, add, remove, totals per category.
//! Only admins see expenses; removal also needs `DeleteItems`.

use tracing::debug;

use crate::auth::{Permission, Session};
use crate::error::ApiError;
use crate::state::Coordinator;
use lanche_core::expense::{expense_totals_by_category, filter_expenses, ExpenseCategoryTotal};
use lanche_core::{Expense, ExpenseFilter, ExpenseInput};

/// Newest first.
pub fn list_expenses(
    coordinator: &Coordinator,
    session: &Session,
    filter: &ExpenseFilter,
) -> Result<Vec<Expense>, ApiError> {
    session.require(Permission::ViewExpenses)?;
    Ok(coordinator.read(|state| filter_expenses(state.expenses(), filter)))
}

pub fn add_expense(
    coordinator: &Coordinator,
    session: &Session,
    input: ExpenseInput,
) -> Result<Expense, ApiError> {
    debug!(category = ?input.category, "add_expense command");
    session.require(Permission::ViewExpenses)?;

    coordinator.mutate(|state| state.add_expense(input))
}

pub fn remove_expense(
    coordinator: &Coordinator,
    session: &Session,
    expense_id: &str,
) -> Result<Expense, ApiError> {
    debug!(expense_id = %expense_id, "remove_expense command");
    session.require(Permission::ViewExpenses)?;
    session.require(Permission::DeleteItems)?;

    coordinator.mutate(|state| state.remove_expense(expense_id))
}

/// Category totals over the expenses `filter` selects.
pub fn expense_totals(
    coordinator: &Coordinator,
    session: &Session,
    filter: &ExpenseFilter,
) -> Result<Vec<ExpenseCategoryTotal>, ApiError> {
    session.require(Permission::ViewExpenses)?;
    Ok(coordinator.read(|state| {
        expense_totals_by_category(&filter_expenses(state.expenses(), filter))
    }))
}
