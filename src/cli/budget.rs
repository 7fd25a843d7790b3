use crate::error::{BookkeeperError, Result};
use crate::presenter::ViewEvent;

use super::open;

/// Changes only the limit; term and category stay as stored.
pub fn set(pk: i64, summa: f64) -> Result<()> {
    if summa < 0.0 {
        return Err(BookkeeperError::Other(format!("Budget limit cannot be negative: {summa}")));
    }
    let mut keeper = open()?;
    let mut budget = keeper
        .repositories()
        .budgets
        .get(pk)?
        .ok_or(BookkeeperError::NotFound { table: "Budget", pk })?;
    budget.summa = summa;
    keeper.handle(ViewEvent::ChangeBudget(budget))?;
    keeper.view().print_budgets();
    Ok(())
}

pub fn list() -> Result<()> {
    let keeper = open()?;
    keeper.view().print_budgets();
    Ok(())
}
