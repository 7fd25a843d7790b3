use std::marker::PhantomData;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info};

use crate::db::get_connection;
use crate::error::{BookkeeperError, Result};
use crate::record::{FieldDescriptor, FieldValue, Filter, Record, SemanticType, TIMESTAMP_FORMAT};
use crate::sql::TableSql;

use super::Repository;

/// Stores one record type in one SQLite table named after the type.
///
/// The table layout and every statement are derived from `T::FIELDS` when
/// the repository is built. A field type without a column mapping makes
/// construction fail, so a built repository can always round-trip its records.
#[derive(Debug)]
pub struct SqliteRepository<T: Record> {
    db_path: PathBuf,
    sql: TableSql,
    _record: PhantomData<fn() -> T>,
}

fn to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Integer(v) => Value::Integer(*v),
        FieldValue::OptionalInteger(Some(v)) => Value::Integer(*v),
        FieldValue::OptionalInteger(None) => Value::Null,
        FieldValue::Text(v) => Value::Text(v.clone()),
        FieldValue::Real(v) => Value::Real(*v),
        FieldValue::Timestamp(v) => Value::Text(v.format(TIMESTAMP_FORMAT).to_string()),
        FieldValue::Boolean(v) => Value::Integer(i64::from(*v)),
    }
}

fn from_sql(table: &'static str, field: &FieldDescriptor, value: Value) -> Result<FieldValue> {
    let decoded = match (field.ty, value) {
        (SemanticType::Integer, Value::Integer(v)) => FieldValue::Integer(v),
        (SemanticType::OptionalInteger, Value::Integer(v)) => FieldValue::OptionalInteger(Some(v)),
        (SemanticType::OptionalInteger, Value::Null) => FieldValue::OptionalInteger(None),
        (SemanticType::Text, Value::Text(v)) => FieldValue::Text(v),
        (SemanticType::Real, Value::Real(v)) => FieldValue::Real(v),
        (SemanticType::Real, Value::Integer(v)) => FieldValue::Real(v as f64),
        (SemanticType::Timestamp, Value::Text(v)) => {
            let ts = NaiveDateTime::parse_from_str(&v, TIMESTAMP_FORMAT).map_err(|e| {
                BookkeeperError::Decode {
                    table,
                    field: field.name,
                    reason: format!("{v:?}: {e}"),
                }
            })?;
            FieldValue::Timestamp(ts)
        }
        (ty, other) => {
            return Err(BookkeeperError::Decode {
                table,
                field: field.name,
                reason: format!("column holds {:?}, field is {ty:?}", other.data_type()),
            })
        }
    };
    Ok(decoded)
}

impl<T: Record> SqliteRepository<T> {
    /// Builds the statements for `T` and creates its table if absent.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let sql = TableSql::build::<T>()?;
        let repo = Self {
            db_path: db_path.into(),
            sql,
            _record: PhantomData,
        };
        let conn = repo.connect()?;
        conn.execute(&repo.sql.create, [])?;
        info!(table = T::TABLE, path = %repo.db_path.display(), "repository ready");
        Ok(repo)
    }

    fn connect(&self) -> Result<Connection> {
        get_connection(&self.db_path)
    }

    fn query(&self, conn: &Connection, sql: &str, params: Vec<Value>) -> Result<Vec<T>> {
        let mut stmt = conn.prepare(sql)?;
        let width = T::FIELDS.len();
        let raw: Vec<(i64, Vec<Value>)> = stmt
            .query_map(params_from_iter(params), |row| {
                let pk: i64 = row.get(0)?;
                let values = (1..=width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok((pk, values))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(pk, columns)| {
                let values = T::FIELDS
                    .iter()
                    .zip(columns)
                    .map(|(field, value)| from_sql(T::TABLE, field, value))
                    .collect::<Result<Vec<_>>>()?;
                T::from_values(pk, values)
            })
            .collect()
    }
}

impl<T: Record> Repository<T> for SqliteRepository<T> {
    fn add(&self, obj: &mut T) -> Result<i64> {
        if obj.is_persisted() {
            return Err(BookkeeperError::InvalidState(format!(
                "cannot add {} with existing pk {}",
                T::TABLE,
                obj.pk()
            )));
        }
        let conn = self.connect()?;
        let params: Vec<Value> = obj.values().iter().map(to_sql).collect();
        conn.execute(&self.sql.insert, params_from_iter(params))?;
        let pk = conn.last_insert_rowid();
        obj.set_pk(pk);
        debug!(table = T::TABLE, pk, "inserted row");
        Ok(pk)
    }

    fn get(&self, pk: i64) -> Result<Option<T>> {
        let conn = self.connect()?;
        let mut rows = self.query(&conn, &self.sql.select_by_pk, vec![Value::Integer(pk)])?;
        Ok(rows.pop())
    }

    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<T>> {
        let (sql, params) = match filter {
            Some(f) if !f.is_empty() => {
                debug!(table = T::TABLE, filter = %f, "filtered select");
                let terms = f.resolve::<T>()?;
                let indices: Vec<usize> = terms.iter().map(|(idx, _, _)| *idx).collect();
                let params: Vec<Value> = terms.iter().map(|(_, _, value)| to_sql(value)).collect();
                (self.sql.select_where(&indices), params)
            }
            _ => (self.sql.select_all.clone(), Vec::new()),
        };
        let conn = self.connect()?;
        self.query(&conn, &sql, params)
    }

    fn update(&self, obj: &T) -> Result<()> {
        if !obj.is_persisted() {
            return Err(BookkeeperError::InvalidState(format!(
                "cannot update {} without a pk",
                T::TABLE
            )));
        }
        let conn = self.connect()?;
        let mut params: Vec<Value> = obj.values().iter().map(to_sql).collect();
        params.push(Value::Integer(obj.pk()));
        let changed = conn.execute(&self.sql.update, params_from_iter(params))?;
        if changed == 0 {
            return Err(BookkeeperError::NotFound {
                table: T::TABLE,
                pk: obj.pk(),
            });
        }
        debug!(table = T::TABLE, pk = obj.pk(), "updated row");
        Ok(())
    }

    fn delete(&self, pk: i64) -> Result<()> {
        let conn = self.connect()?;
        let changed = conn.execute(&self.sql.delete, [pk])?;
        if changed == 0 {
            return Err(BookkeeperError::NotFound { table: T::TABLE, pk });
        }
        debug!(table = T::TABLE, pk, "deleted row");
        Ok(())
    }
}
