use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, budget_statuses, BudgetStatus, PeriodTotals, DAY_TERM, MONTH_TERM, WEEK_TERM};
use crate::error::{BookkeeperError, Result};
use crate::models::{Budget, Category, Expense};
use crate::record::Filter;
use crate::repository::{MemoryRepository, Repository, SqliteRepository};

pub const DEFAULT_CATEGORIES: &[&str] = &["Транспорт", "Дом", "Продукты"];

// (summa, term in days)
pub const DEFAULT_BUDGETS: &[(f64, i64)] = &[(1000.0, DAY_TERM), (3000.0, WEEK_TERM), (10000.0, MONTH_TERM)];

/// Receives everything the user should see. The coordinator pushes fresh
/// state after every change; a view never queries storage itself.
pub trait View {
    fn set_budgets(&mut self, budgets: &[Budget]);
    fn set_categories(&mut self, categories: &[Category]);
    fn set_expenses(&mut self, expenses: &[Expense]);
    fn set_totals(&mut self, totals: PeriodTotals);

    fn set_budget_statuses(&mut self, _statuses: &[BudgetStatus]) {}
}

/// A user action coming from the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    AddExpense {
        amount: f64,
        category: String,
        date: NaiveDateTime,
        comment: String,
    },
    ChangeExpense {
        pk: i64,
        amount: f64,
        category: String,
        date: NaiveDateTime,
        comment: String,
    },
    DeleteExpense(i64),
    AddCategory(Category),
    DeleteCategory(String),
    ChangeBudget(Budget),
}

pub struct Repositories {
    pub categories: Box<dyn Repository<Category>>,
    pub budgets: Box<dyn Repository<Budget>>,
    pub expenses: Box<dyn Repository<Expense>>,
}

impl Repositories {
    /// All three tables in one database file.
    pub fn sqlite(db_path: &Path) -> Result<Self> {
        Ok(Self {
            categories: Box::new(SqliteRepository::<Category>::new(db_path)?),
            budgets: Box::new(SqliteRepository::<Budget>::new(db_path)?),
            expenses: Box::new(SqliteRepository::<Expense>::new(db_path)?),
        })
    }

    pub fn memory() -> Result<Self> {
        Ok(Self {
            categories: Box::new(MemoryRepository::<Category>::new()?),
            budgets: Box::new(MemoryRepository::<Budget>::new()?),
            expenses: Box::new(MemoryRepository::<Expense>::new()?),
        })
    }
}

fn finite(what: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BookkeeperError::InvalidAmount { what, value })
    }
}

type Clock = Box<dyn Fn() -> NaiveDateTime>;

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Routes view events to the repositories and re-renders after each one.
pub struct Bookkeeper<V: View> {
    view: V,
    repos: Repositories,
    clock: Clock,
}

impl<V: View> Bookkeeper<V> {
    pub fn new(view: V, repos: Repositories) -> Result<Self> {
        Self::with_clock(view, repos, local_now)
    }

    /// Seeds defaults into empty tables and renders the initial state.
    pub fn with_clock(
        view: V,
        repos: Repositories,
        clock: impl Fn() -> NaiveDateTime + 'static,
    ) -> Result<Self> {
        let mut keeper = Self {
            view,
            repos,
            clock: Box::new(clock),
        };
        keeper.seed_defaults()?;
        keeper.refresh()?;
        Ok(keeper)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    fn seed_defaults(&self) -> Result<()> {
        if self.repos.budgets.get_all(None)?.is_empty() {
            for (summa, term) in DEFAULT_BUDGETS {
                self.repos.budgets.add(&mut Budget::new(*summa, *term))?;
            }
            info!(count = DEFAULT_BUDGETS.len(), "seeded default budgets");
        }
        if self.repos.categories.get_all(None)?.is_empty() {
            for name in DEFAULT_CATEGORIES {
                self.repos.categories.add(&mut Category::new(*name))?;
            }
            info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
        }
        Ok(())
    }

    /// Re-reads every table, re-aggregates, and pushes it all to the view.
    pub fn refresh(&mut self) -> Result<()> {
        let budgets = self.repos.budgets.get_all(None)?;
        let categories = self.repos.categories.get_all(None)?;
        let expenses = self.repos.expenses.get_all(None)?;
        let now = (self.clock)();

        let totals = aggregate(&expenses, now);
        let statuses = budget_statuses(&budgets, &categories, &expenses, now);

        self.view.set_budgets(&budgets);
        self.view.set_categories(&categories);
        self.view.set_expenses(&expenses);
        self.view.set_totals(totals);
        self.view.set_budget_statuses(&statuses);
        Ok(())
    }

    /// Resolves a category name to its pk. Anything but exactly one match is
    /// an integrity problem and aborts the caller.
    pub fn category_pk(&self, name: &str) -> Result<i64> {
        let matches = self
            .repos
            .categories
            .get_all(Some(&Filter::new().eq("name", name)))?;
        match matches.as_slice() {
            [only] => Ok(only.pk),
            _ => {
                warn!(name, matches = matches.len(), "category lookup is ambiguous");
                Err(BookkeeperError::Ambiguity {
                    name: name.to_string(),
                    matches: matches.len(),
                })
            }
        }
    }

    pub fn handle(&mut self, event: ViewEvent) -> Result<()> {
        debug!(?event, "dispatching view event");
        match event {
            ViewEvent::AddExpense {
                amount,
                category,
                date,
                comment,
            } => self.add_expense(amount, &category, date, &comment).map(|_| ()),
            ViewEvent::ChangeExpense {
                pk,
                amount,
                category,
                date,
                comment,
            } => self.change_expense(pk, amount, &category, date, &comment),
            ViewEvent::DeleteExpense(pk) => self.delete_expense(pk),
            ViewEvent::AddCategory(category) => self.add_category(category).map(|_| ()),
            ViewEvent::DeleteCategory(name) => self.delete_category(&name),
            ViewEvent::ChangeBudget(budget) => self.change_budget(budget),
        }
    }

    pub fn add_expense(&mut self, amount: f64, category: &str, date: NaiveDateTime, comment: &str) -> Result<i64> {
        let amount = finite("Expense amount", amount)?;
        let category_pk = self.category_pk(category)?;
        let mut expense = Expense::new(amount, category_pk, date).with_comment(comment);
        let pk = self.repos.expenses.add(&mut expense)?;
        self.refresh()?;
        Ok(pk)
    }

    pub fn change_expense(
        &mut self,
        pk: i64,
        amount: f64,
        category: &str,
        date: NaiveDateTime,
        comment: &str,
    ) -> Result<()> {
        let amount = finite("Expense amount", amount)?;
        let category_pk = self.category_pk(category)?;
        let expense = Expense {
            amount,
            category_pk,
            expense_date: date,
            comment: comment.to_string(),
            pk,
        };
        self.repos.expenses.update(&expense)?;
        self.refresh()
    }

    pub fn delete_expense(&mut self, pk: i64) -> Result<()> {
        self.repos.expenses.delete(pk)?;
        self.refresh()
    }

    pub fn add_category(&mut self, mut category: Category) -> Result<i64> {
        let pk = self.repos.categories.add(&mut category)?;
        self.refresh()?;
        Ok(pk)
    }

    /// Expenses that referenced the category keep their dangling pk.
    pub fn delete_category(&mut self, name: &str) -> Result<()> {
        let pk = self.category_pk(name)?;
        self.repos.categories.delete(pk)?;
        info!(name, pk, "deleted category");
        self.refresh()
    }

    pub fn change_budget(&mut self, budget: Budget) -> Result<()> {
        finite("Budget limit", budget.summa)?;
        self.repos.budgets.update(&budget)?;
        self.refresh()
    }
}
