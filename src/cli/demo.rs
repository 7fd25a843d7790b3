use chrono::{Duration, Local, NaiveTime};

use crate::error::Result;
use crate::presenter::{Bookkeeper, Repositories};

use super::console::ConsoleView;

struct DemoExpense {
    days_ago: i64,
    hour: i64,
    amount: f64,
    category: &'static str,
    comment: &'static str,
}

const EXPENSES: &[DemoExpense] = &[
    DemoExpense { days_ago: 0, hour: 9, amount: 180.0, category: "Продукты", comment: "хлеб, молоко" },
    DemoExpense { days_ago: 0, hour: 8, amount: 65.0, category: "Транспорт", comment: "метро" },
    DemoExpense { days_ago: 2, hour: 19, amount: 1240.5, category: "Продукты", comment: "" },
    DemoExpense { days_ago: 4, hour: 12, amount: 3200.0, category: "Дом", comment: "лампы" },
    DemoExpense { days_ago: 6, hour: 18, amount: 450.0, category: "Транспорт", comment: "такси" },
    DemoExpense { days_ago: 12, hour: 10, amount: 2890.0, category: "Продукты", comment: "" },
    DemoExpense { days_ago: 20, hour: 15, amount: 5400.0, category: "Дом", comment: "коммуналка" },
    DemoExpense { days_ago: 45, hour: 11, amount: 990.0, category: "Дом", comment: "не попадает в месяц" },
];

/// Runs against an in-memory store, so nothing touches the configured database.
pub fn run() -> Result<()> {
    let mut keeper = Bookkeeper::new(ConsoleView::default(), Repositories::memory()?)?;
    let now = Local::now().naive_local();
    let midnight = now.date().and_time(NaiveTime::MIN);
    for e in EXPENSES {
        let date = midnight - Duration::days(e.days_ago) + Duration::hours(e.hour);
        keeper.add_expense(e.amount, e.category, date.min(now), e.comment)?;
    }

    let view = keeper.view();
    println!("Demo data (in memory)\n");
    view.print_totals();
    println!();
    view.print_budgets();
    view.print_all_expenses();
    Ok(())
}
