pub mod budget;
pub mod categories;
pub mod console;
pub mod demo;
pub mod expense;
pub mod init;
pub mod status;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

use crate::error::{BookkeeperError, Result};
use crate::presenter::{Bookkeeper, Repositories};
use crate::record::TIMESTAMP_FORMAT;
use crate::settings::load_settings;

use console::ConsoleView;

/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
pub(crate) fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            BookkeeperError::Other(format!(
                "Invalid date: {s} (expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)"
            ))
        })
}

pub(crate) fn parse_date_or_now(date: Option<&str>) -> Result<NaiveDateTime> {
    match date {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

/// Opens the configured database, seeding it on first use.
pub(crate) fn open() -> Result<Bookkeeper<ConsoleView>> {
    let db_path = load_settings().db_path();
    Bookkeeper::new(ConsoleView::default(), Repositories::sqlite(&db_path)?)
}

#[derive(Parser)]
#[command(name = "bookkeeper", about = "Track expenses against day, week and month budgets.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and create the database with default data.
    Init {
        /// Path for bookkeeper data (default: ~/Documents/bookkeeper)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Show budgets, running totals and recent expenses.
    Status,
    /// Show sample data from an in-memory store.
    Demo,
    /// Record and edit expenses.
    Expense {
        #[command(subcommand)]
        command: ExpenseCommands,
    },
    /// Manage expense categories.
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Inspect and adjust budgets.
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense.
    Add {
        #[arg(long)]
        amount: f64,
        /// Category name (must match exactly one category)
        #[arg(long)]
        category: String,
        /// YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS" (default: now)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Overwrite an existing expense.
    Change {
        #[arg(long)]
        pk: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Delete an expense.
    Delete {
        #[arg(long)]
        pk: i64,
    },
    /// List expenses, optionally for one category.
    List {
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a category.
    Add { name: String },
    /// List categories.
    List,
    /// Delete the category with this exact name.
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Change the limit of a budget.
    Set {
        #[arg(long)]
        pk: i64,
        #[arg(long)]
        summa: f64,
    },
    /// List budgets with what has been spent against them.
    List,
}
