use chrono::{Duration, NaiveDateTime};

use crate::models::{Budget, Category, Expense};

pub const DAY_TERM: i64 = 1;
pub const WEEK_TERM: i64 = 7;
pub const MONTH_TERM: i64 = 31;

/// Running sums over the trailing day, week and month. Windows overlap, so
/// anything counted in `day` is also counted in `week` and `month`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodTotals {
    pub day: f64,
    pub week: f64,
    pub month: f64,
}

impl PeriodTotals {
    pub fn as_array(&self) -> [f64; 3] {
        [self.day, self.week, self.month]
    }
}

fn in_window(expense: &Expense, now: NaiveDateTime, days: i64) -> bool {
    let start = now - Duration::days(days);
    expense.expense_date >= start && expense.expense_date <= now
}

/// Total amount of expenses dated within `[now - days, now]`.
pub fn sum_in_window<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    now: NaiveDateTime,
    days: i64,
) -> f64 {
    expenses
        .into_iter()
        .filter(|e| in_window(e, now, days))
        .map(|e| e.amount)
        .sum()
}

pub fn aggregate(expenses: &[Expense], now: NaiveDateTime) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for expense in expenses {
        if in_window(expense, now, MONTH_TERM) {
            totals.month += expense.amount;
        }
        if in_window(expense, now, WEEK_TERM) {
            totals.week += expense.amount;
        }
        if in_window(expense, now, DAY_TERM) {
            totals.day += expense.amount;
        }
    }
    totals
}

/// A budget next to what has been spent over its term.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: f64,
}

impl BudgetStatus {
    pub fn remaining(&self) -> f64 {
        self.budget.summa - self.spent
    }

    pub fn is_exceeded(&self) -> bool {
        self.spent > self.budget.summa
    }
}

/// Compares each budget against the expenses inside its term. A budget with
/// a category only counts expenses whose category carries that name.
pub fn budget_statuses(
    budgets: &[Budget],
    categories: &[Category],
    expenses: &[Expense],
    now: NaiveDateTime,
) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|budget| {
            let spent = if budget.category.is_empty() {
                sum_in_window(expenses, now, budget.term)
            } else {
                let scoped: Vec<i64> = categories
                    .iter()
                    .filter(|c| c.name == budget.category)
                    .map(|c| c.pk)
                    .collect();
                sum_in_window(
                    expenses.iter().filter(|e| scoped.contains(&e.category_pk)),
                    now,
                    budget.term,
                )
            };
            BudgetStatus {
                budget: budget.clone(),
                spent,
            }
        })
        .collect()
}
