//! Storage contract shared by every backend.

pub mod memory;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod contract;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

use crate::error::Result;
use crate::record::{Filter, Record};

/// CRUD over one record type, keyed by the synthetic integer `pk`.
pub trait Repository<T: Record> {
    /// Persists a new record and writes the assigned pk back into `obj`.
    ///
    /// Fails with `InvalidState` if `obj` already carries a pk.
    fn add(&self, obj: &mut T) -> Result<i64>;

    /// `Ok(None)` when no record has this pk.
    fn get(&self, pk: i64) -> Result<Option<T>>;

    /// Records matching every term of `filter`, in pk order. `None` returns all.
    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<T>>;

    /// Overwrites every field of the stored record with the same pk.
    ///
    /// Fails with `InvalidState` if `obj` has no pk and `NotFound` if the
    /// pk is not stored.
    fn update(&self, obj: &T) -> Result<()>;

    /// Fails with `NotFound` if the pk is not stored.
    fn delete(&self, pk: i64) -> Result<()>;
}
