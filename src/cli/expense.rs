use crate::error::Result;
use crate::presenter::ViewEvent;
use crate::record::Filter;

use super::{open, parse_date, parse_date_or_now};

pub fn add(amount: f64, category: &str, date: Option<&str>, comment: Option<&str>) -> Result<()> {
    let date = parse_date_or_now(date)?;
    let mut keeper = open()?;
    keeper.handle(ViewEvent::AddExpense {
        amount,
        category: category.to_string(),
        date,
        comment: comment.unwrap_or_default().to_string(),
    })?;
    if let Some(added) = keeper.view().latest_expense() {
        println!("Added expense {}: {} ({category})", added.pk, crate::fmt::amount(added.amount));
    }
    keeper.view().print_totals();
    Ok(())
}

pub fn change(pk: i64, amount: f64, category: &str, date: &str, comment: Option<&str>) -> Result<()> {
    let date = parse_date(date)?;
    let mut keeper = open()?;
    keeper.handle(ViewEvent::ChangeExpense {
        pk,
        amount,
        category: category.to_string(),
        date,
        comment: comment.unwrap_or_default().to_string(),
    })?;
    println!("Updated expense {pk}");
    keeper.view().print_totals();
    Ok(())
}

pub fn delete(pk: i64) -> Result<()> {
    let mut keeper = open()?;
    keeper.handle(ViewEvent::DeleteExpense(pk))?;
    println!("Deleted expense {pk}");
    keeper.view().print_totals();
    Ok(())
}

pub fn list(category: Option<&str>) -> Result<()> {
    let keeper = open()?;
    match category {
        Some(name) => {
            let category_pk = keeper.category_pk(name)?;
            let filter = Filter::new().eq("category_pk", category_pk);
            let expenses = keeper.repositories().expenses.get_all(Some(&filter))?;
            keeper.view().print_expenses(&expenses);
        }
        None => keeper.view().print_all_expenses(),
    }
    Ok(())
}
