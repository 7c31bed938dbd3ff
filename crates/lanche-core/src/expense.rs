//! # Expenses
//!
//! Operating costs that are not supplier purchases: rent, salaries,
//! utilities, taxes.
//!
//! ```text
//! add_expense(input) ──► validate ──► Expense (created_at = now)
//!                                        │
//!                    ┌───────────────────┼────────────────────┐
//!                    ▼                   ▼                    ▼
//!          filter_expenses      expense_totals_by_category   cash register
//!          (category, dates)    (highest first)              (cash only)
//! ```

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::state::AppState;
use crate::types::{Expense, ExpenseCategory, ExpensePaymentMethod};
use crate::validation::{optional_text, validate_price, validate_text};

/// Editable expense fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Money,
    pub payment_method: ExpensePaymentMethod,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Narrows an expense listing. Empty fields match everything; both date
/// bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.map_or(true, |c| c == expense.category)
            && self.start_date.map_or(true, |d| expense.date >= d)
            && self.end_date.map_or(true, |d| expense.date <= d)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategoryTotal {
    pub category: ExpenseCategory,
    pub label: String,
    pub count: usize,
    pub total: Money,
}

impl AppState {
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn add_expense(&mut self, input: ExpenseInput) -> CoreResult<Expense> {
        let description = validate_text("description", &input.description, 200)?;
        validate_price("amount", input.amount)?;
        if input.amount.is_zero() {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
            }
            .into());
        }

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            date: input.date,
            category: input.category,
            description,
            amount: input.amount,
            payment_method: input.payment_method,
            supplier: optional_text(input.supplier),
            reference: optional_text(input.reference),
            created_at: Utc::now(),
        };

        self.expenses.push(expense.clone());
        info!(
            expense_id = %expense.id,
            category = expense.category.label(),
            amount = %expense.amount,
            "Expense added"
        );
        Ok(expense)
    }

    pub fn remove_expense(&mut self, id: &str) -> CoreResult<Expense> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::ExpenseNotFound(id.to_string()))?;

        let removed = self.expenses.remove(index);
        info!(expense_id = %removed.id, "Expense removed");
        Ok(removed)
    }
}

/// Matching expenses, newest `date` first.
pub fn filter_expenses(expenses: &[Expense], filter: &ExpenseFilter) -> Vec<Expense> {
    let mut matching: Vec<Expense> = expenses
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect();
    matching.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    matching
}

/// Spend per category, highest first. Categories without expenses are left out.
pub fn expense_totals_by_category(expenses: &[Expense]) -> Vec<ExpenseCategoryTotal> {
    let mut totals: HashMap<ExpenseCategory, (usize, Money)> = HashMap::new();
    for expense in expenses {
        let entry = totals.entry(expense.category).or_default();
        entry.0 += 1;
        entry.1 += expense.amount;
    }

    let mut result: Vec<ExpenseCategoryTotal> = ExpenseCategory::ALL
        .into_iter()
        .filter_map(|category| {
            totals.get(&category).map(|(count, total)| ExpenseCategoryTotal {
                category,
                label: category.label().to_string(),
                count: *count,
                total: *total,
            })
        })
        .collect();
    // stable: equal totals keep ALL order
    result.sort_by(|a, b| b.total.cmp(&a.total));
    result
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn input(d: u32, category: ExpenseCategory, cents: i64) -> ExpenseInput {
        ExpenseInput {
            date: day(d),
            category,
            description: format!("{} março", category.label()),
            amount: Money::from_cents(cents),
            payment_method: ExpensePaymentMethod::Pix,
            supplier: None,
            reference: None,
        }
    }

    #[test]
    fn test_add_trims_and_drops_blank_optionals() {
        let mut state = AppState::new();
        let mut rent = input(5, ExpenseCategory::Rent, 250_000);
        rent.description = "  Aluguel loja  ".to_string();
        rent.supplier = Some("   ".to_string());
        rent.reference = Some(" NF 123 ".to_string());

        let expense = state.add_expense(rent).unwrap();
        assert_eq!(expense.description, "Aluguel loja");
        assert_eq!(expense.supplier, None);
        assert_eq!(expense.reference.as_deref(), Some("NF 123"));
        assert_eq!(state.expenses().len(), 1);
    }

    #[test]
    fn test_invalid_expenses_change_nothing() {
        let mut state = AppState::new();

        let mut blank = input(1, ExpenseCategory::Water, 100);
        blank.description = " ".to_string();
        assert!(matches!(
            state.add_expense(blank),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            state.add_expense(input(1, ExpenseCategory::Water, 0)),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(matches!(
            state.add_expense(input(1, ExpenseCategory::Water, -10)),
            Err(CoreError::Validation(ValidationError::MustNotBeNegative { .. }))
        ));
        assert!(state.expenses().is_empty());
    }

    #[test]
    fn test_remove_expense() {
        let mut state = AppState::new();
        let gas = state.add_expense(input(2, ExpenseCategory::Gas, 12_000)).unwrap();

        assert_eq!(state.remove_expense(&gas.id).unwrap().id, gas.id);
        assert!(matches!(
            state.remove_expense(&gas.id),
            Err(CoreError::ExpenseNotFound(_))
        ));
    }

    #[test]
    fn test_filter_by_category_and_inclusive_dates() {
        let mut state = AppState::new();
        state.add_expense(input(1, ExpenseCategory::Rent, 250_000)).unwrap();
        state.add_expense(input(10, ExpenseCategory::Electricity, 40_000)).unwrap();
        state.add_expense(input(20, ExpenseCategory::Electricity, 45_000)).unwrap();

        let all = filter_expenses(state.expenses(), &ExpenseFilter::default());
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, day(20));

        let energy = filter_expenses(
            state.expenses(),
            &ExpenseFilter {
                category: Some(ExpenseCategory::Electricity),
                ..ExpenseFilter::default()
            },
        );
        assert_eq!(energy.len(), 2);

        let window = filter_expenses(
            state.expenses(),
            &ExpenseFilter {
                category: None,
                start_date: Some(day(1)),
                end_date: Some(day(10)),
            },
        );
        assert_eq!(window.len(), 2);
        assert_eq!(window[1].category, ExpenseCategory::Rent);
    }

    #[test]
    fn test_totals_by_category_highest_first() {
        let mut state = AppState::new();
        state.add_expense(input(1, ExpenseCategory::Water, 9_000)).unwrap();
        state.add_expense(input(2, ExpenseCategory::Salaries, 300_000)).unwrap();
        state.add_expense(input(3, ExpenseCategory::Water, 8_000)).unwrap();

        let totals = expense_totals_by_category(state.expenses());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, ExpenseCategory::Salaries);
        assert_eq!(totals[1].label, "Água");
        assert_eq!(totals[1].count, 2);
        assert_eq!(totals[1].total.cents(), 17_000);

        assert!(expense_totals_by_category(&[]).is_empty());
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_string(&ExpenseCategory::Maintenance).unwrap(),
            "\"manutencao\""
        );
        assert_eq!(
            serde_json::to_string(&ExpensePaymentMethod::Cash).unwrap(),
            "\"dinheiro\""
        );
    }
}
