use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::aggregate::{BudgetStatus, PeriodTotals};
use crate::fmt::{amount, term, timestamp};
use crate::models::{Budget, Category, Expense};
use crate::presenter::View;

/// Holds the last state pushed by the coordinator and prints it on request.
#[derive(Debug, Default)]
pub struct ConsoleView {
    budgets: Vec<Budget>,
    categories: Vec<Category>,
    expenses: Vec<Expense>,
    totals: PeriodTotals,
    statuses: Vec<BudgetStatus>,
}

impl View for ConsoleView {
    fn set_budgets(&mut self, budgets: &[Budget]) {
        self.budgets = budgets.to_vec();
    }

    fn set_categories(&mut self, categories: &[Category]) {
        self.categories = categories.to_vec();
    }

    fn set_expenses(&mut self, expenses: &[Expense]) {
        self.expenses = expenses.to_vec();
    }

    fn set_totals(&mut self, totals: PeriodTotals) {
        self.totals = totals;
    }

    fn set_budget_statuses(&mut self, statuses: &[BudgetStatus]) {
        self.statuses = statuses.to_vec();
    }
}

impl ConsoleView {
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Highest pk, i.e. the most recently added expense.
    pub fn latest_expense(&self) -> Option<&Expense> {
        self.expenses.iter().max_by_key(|e| e.pk)
    }

    fn category_name(&self, pk: i64) -> String {
        self.categories
            .iter()
            .find(|c| c.pk == pk)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("#{pk}"))
    }

    pub fn expense_table(&self, expenses: &[Expense]) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["PK", "Date", "Amount", "Category", "Comment"]);
        for e in expenses {
            table.add_row(vec![
                Cell::new(e.pk),
                Cell::new(timestamp(&e.expense_date)),
                Cell::new(amount(e.amount)),
                Cell::new(self.category_name(e.category_pk)),
                Cell::new(&e.comment),
            ]);
        }
        table
    }

    pub fn category_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["PK", "Name"]);
        for c in &self.categories {
            table.add_row(vec![Cell::new(c.pk), Cell::new(&c.name)]);
        }
        table
    }

    pub fn budget_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["PK", "Term", "Category", "Limit", "Spent", "Remaining"]);
        for s in &self.statuses {
            let remaining = amount(s.remaining());
            let remaining = if s.is_exceeded() {
                remaining.red().to_string()
            } else {
                remaining.green().to_string()
            };
            table.add_row(vec![
                Cell::new(s.budget.pk),
                Cell::new(term(s.budget.term)),
                Cell::new(&s.budget.category),
                Cell::new(amount(s.budget.summa)),
                Cell::new(amount(s.spent)),
                Cell::new(remaining),
            ]);
        }
        table
    }

    pub fn print_expenses(&self, expenses: &[Expense]) {
        if expenses.is_empty() {
            println!("No expenses.");
            return;
        }
        println!("Expenses\n{}", self.expense_table(expenses));
    }

    pub fn print_all_expenses(&self) {
        self.print_expenses(&self.expenses);
    }

    pub fn print_categories(&self) {
        println!("Categories\n{}", self.category_table());
    }

    pub fn print_budgets(&self) {
        println!("Budgets\n{}", self.budget_table());
    }

    pub fn print_totals(&self) {
        let labels = ["Spent today:", "Spent this week:", "Spent this month:"];
        for (label, total) in labels.iter().zip(self.totals.as_array()) {
            println!("{label:<18} {}", amount(total));
        }
    }
}
