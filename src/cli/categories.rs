use crate::error::Result;
use crate::models::Category;
use crate::presenter::ViewEvent;

use super::open;

pub fn add(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(crate::error::BookkeeperError::Other("Name is required".into()));
    }
    let mut keeper = open()?;
    keeper.handle(ViewEvent::AddCategory(Category::new(name)))?;
    println!("Added category: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let keeper = open()?;
    keeper.view().print_categories();
    Ok(())
}

pub fn delete(name: &str) -> Result<()> {
    let mut keeper = open()?;
    keeper.handle(ViewEvent::DeleteCategory(name.to_string()))?;
    println!("Deleted category: {name}");
    Ok(())
}
