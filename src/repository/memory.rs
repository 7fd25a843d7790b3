use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{BookkeeperError, Result};
use crate::record::{column_mappings, FieldValue, Filter, Record};

use super::Repository;

/// Keeps records in process memory. Pks start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryRepository<T: Record> {
    rows: RefCell<BTreeMap<i64, T>>,
    next_pk: Cell<i64>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Result<Self> {
        column_mappings::<T>()?;
        Ok(Self {
            rows: RefCell::new(BTreeMap::new()),
            next_pk: Cell::new(1),
        })
    }

    /// The copy kept in memory, at the same precision SQLite would return.
    fn stored(obj: &T, pk: i64) -> Result<T> {
        let values = obj
            .values()
            .into_iter()
            .map(FieldValue::at_storage_precision)
            .collect();
        T::from_values(pk, values)
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn add(&self, obj: &mut T) -> Result<i64> {
        if obj.is_persisted() {
            return Err(BookkeeperError::InvalidState(format!(
                "cannot add {} with existing pk {}",
                T::TABLE,
                obj.pk()
            )));
        }
        let pk = self.next_pk.get();
        let row = Self::stored(obj, pk)?;
        self.next_pk.set(pk + 1);
        obj.set_pk(pk);
        self.rows.borrow_mut().insert(pk, row);
        debug!(table = T::TABLE, pk, "added record in memory");
        Ok(pk)
    }

    fn get(&self, pk: i64) -> Result<Option<T>> {
        Ok(self.rows.borrow().get(&pk).cloned())
    }

    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<T>> {
        let terms: Vec<(usize, FieldValue)> = match filter {
            Some(f) => f
                .resolve::<T>()?
                .into_iter()
                .map(|(idx, _, value)| (idx, value.clone().at_storage_precision()))
                .collect(),
            None => Vec::new(),
        };
        let rows = self.rows.borrow();
        Ok(rows
            .values()
            .filter(|obj| {
                let values = obj.values();
                terms.iter().all(|(idx, wanted)| values[*idx].matches(wanted))
            })
            .cloned()
            .collect())
    }

    fn update(&self, obj: &T) -> Result<()> {
        if !obj.is_persisted() {
            return Err(BookkeeperError::InvalidState(format!(
                "cannot update {} without a pk",
                T::TABLE
            )));
        }
        let mut rows = self.rows.borrow_mut();
        match rows.get_mut(&obj.pk()) {
            Some(slot) => {
                *slot = Self::stored(obj, obj.pk())?;
                Ok(())
            }
            None => Err(BookkeeperError::NotFound {
                table: T::TABLE,
                pk: obj.pk(),
            }),
        }
    }

    fn delete(&self, pk: i64) -> Result<()> {
        match self.rows.borrow_mut().remove(&pk) {
            Some(_) => Ok(()),
            None => Err(BookkeeperError::NotFound { table: T::TABLE, pk }),
        }
    }
}
