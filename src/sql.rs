//! Statement text for one record table.
//!
//! Identifiers come only from a record type's static field list and are
//! validated once when the statements are built. Values are always bound as
//! numbered parameters.

use crate::error::{BookkeeperError, Result};
use crate::record::{column_mappings, Record, PK_COLUMN};

#[derive(Debug, Clone)]
pub struct TableSql {
    columns: Vec<&'static str>,
    select_head: String,
    pub create: String,
    pub insert: String,
    pub select_by_pk: String,
    pub select_all: String,
    pub update: String,
    pub delete: String,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote(name: &str) -> String {
    format!("\"{name}\"")
}

impl TableSql {
    /// Builds every statement for `T`. Fails on an unsupported field type
    /// or a field/table name that is not a plain identifier.
    pub fn build<T: Record>() -> Result<Self> {
        if !is_identifier(T::TABLE) {
            return Err(BookkeeperError::Other(format!("invalid table name: {:?}", T::TABLE)));
        }

        let mappings = column_mappings::<T>()?;
        let mut columns = Vec::with_capacity(T::FIELDS.len());
        let mut column_defs = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quote(PK_COLUMN))];
        for (field, mapping) in T::FIELDS.iter().zip(mappings) {
            if field.name == PK_COLUMN || !is_identifier(field.name) {
                return Err(BookkeeperError::Other(format!(
                    "invalid field name on {}: {:?}",
                    T::TABLE,
                    field.name
                )));
            }
            let null = if mapping.nullable { "" } else { " NOT NULL" };
            column_defs.push(format!("{} {}{null}", quote(field.name), mapping.column.sql()));
            columns.push(field.name);
        }

        let table = quote(T::TABLE);
        let pk = quote(PK_COLUMN);
        let quoted: Vec<String> = columns.iter().map(|c| quote(c)).collect();
        let select_list = std::iter::once(pk.clone())
            .chain(quoted.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = quoted
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let pk_param = columns.len() + 1;
        let select_head = format!("SELECT {select_list} FROM {table}");

        Ok(Self {
            create: format!("CREATE TABLE IF NOT EXISTS {table} ({})", column_defs.join(", ")),
            insert: format!("INSERT INTO {table} ({}) VALUES ({placeholders})", quoted.join(", ")),
            select_by_pk: format!("{select_head} WHERE {pk} = ?1"),
            select_all: format!("{select_head} ORDER BY {pk}"),
            update: format!("UPDATE {table} SET {assignments} WHERE {pk} = ?{pk_param}"),
            delete: format!("DELETE FROM {table} WHERE {pk} = ?1"),
            columns,
            select_head,
        })
    }

    /// SELECT restricted by a null-safe equality on each given field index.
    /// Indices refer to the record's `FIELDS`; anything else is a bug in the caller.
    pub fn select_where(&self, field_indices: &[usize]) -> String {
        if field_indices.is_empty() {
            return self.select_all.clone();
        }
        let predicate = field_indices
            .iter()
            .enumerate()
            .map(|(i, &idx)| format!("{} IS ?{}", quote(self.columns[idx]), i + 1))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!("{} WHERE {predicate} ORDER BY {}", self.select_head, quote(PK_COLUMN))
    }
}
