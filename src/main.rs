mod aggregate;
mod cli;
mod db;
mod error;
mod fmt;
mod logging;
mod models;
mod presenter;
mod record;
mod repository;
mod settings;
mod sql;

use clap::Parser;

use cli::{BudgetCommands, CategoryCommands, Cli, Commands, ExpenseCommands};

fn main() {
    let cli = Cli::parse();
    logging::init(&settings::load_settings().log_level);

    let result = match cli.command {
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Status) | None => cli::status::run(),
        Some(Commands::Demo) => cli::demo::run(),
        Some(Commands::Expense { command }) => match command {
            ExpenseCommands::Add {
                amount,
                category,
                date,
                comment,
            } => cli::expense::add(amount, &category, date.as_deref(), comment.as_deref()),
            ExpenseCommands::Change {
                pk,
                amount,
                category,
                date,
                comment,
            } => cli::expense::change(pk, amount, &category, &date, comment.as_deref()),
            ExpenseCommands::Delete { pk } => cli::expense::delete(pk),
            ExpenseCommands::List { category } => cli::expense::list(category.as_deref()),
        },
        Some(Commands::Category { command }) => match command {
            CategoryCommands::Add { name } => cli::categories::add(&name),
            CategoryCommands::List => cli::categories::list(),
            CategoryCommands::Delete { name } => cli::categories::delete(&name),
        },
        Some(Commands::Budget { command }) => match command {
            BudgetCommands::Set { pk, summa } => cli::budget::set(pk, summa),
            BudgetCommands::List => cli::budget::list(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
