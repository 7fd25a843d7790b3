//! Field descriptors and values shared by every persisted record type.
//!
//! A record type lists its fields once, in declaration order, as a static
//! `FieldDescriptor` slice. Repositories derive their schema and queries from
//! that list, and records cross the storage boundary as `FieldValue` vectors
//! in the same order.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::error::{BookkeeperError, Result};

/// Storage format for timestamps. Second granularity.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name of the synthetic primary key column present on every table.
pub const PK_COLUMN: &str = "pk";

/// What a field holds, independent of how it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Integer,
    OptionalInteger,
    Text,
    Real,
    Timestamp,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Real,
}

impl ColumnType {
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
        }
    }
}

/// Column type and nullability a semantic type is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub column: ColumnType,
    pub nullable: bool,
}

impl SemanticType {
    /// Returns `None` for types that have no column representation.
    pub fn column_mapping(self) -> Option<ColumnMapping> {
        let (column, nullable) = match self {
            SemanticType::Integer => (ColumnType::Integer, false),
            SemanticType::OptionalInteger => (ColumnType::Integer, true),
            SemanticType::Text => (ColumnType::Text, false),
            SemanticType::Real => (ColumnType::Real, false),
            SemanticType::Timestamp => (ColumnType::Text, false),
            SemanticType::Boolean => return None,
        };
        Some(ColumnMapping { column, nullable })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: SemanticType,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, ty: SemanticType) -> Self {
        Self { name, ty }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    OptionalInteger(Option<i64>),
    Text(String),
    Real(f64),
    Timestamp(NaiveDateTime),
    Boolean(bool),
}

impl FieldValue {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            FieldValue::Integer(_) => SemanticType::Integer,
            FieldValue::OptionalInteger(_) => SemanticType::OptionalInteger,
            FieldValue::Text(_) => SemanticType::Text,
            FieldValue::Real(_) => SemanticType::Real,
            FieldValue::Timestamp(_) => SemanticType::Timestamp,
            FieldValue::Boolean(_) => SemanticType::Boolean,
        }
    }

    /// Whether this value can be compared against a field of type `ty`.
    pub fn fits(&self, ty: SemanticType) -> bool {
        matches!(
            (self, ty),
            (FieldValue::Integer(_), SemanticType::Integer)
                | (FieldValue::Integer(_), SemanticType::OptionalInteger)
                | (FieldValue::Integer(_), SemanticType::Real)
                | (FieldValue::OptionalInteger(_), SemanticType::OptionalInteger)
                | (FieldValue::Text(_), SemanticType::Text)
                | (FieldValue::Real(_), SemanticType::Real)
                | (FieldValue::Timestamp(_), SemanticType::Timestamp)
        )
    }

    /// The value as it reads back from storage. Timestamps drop sub-second
    /// precision to match `TIMESTAMP_FORMAT`.
    pub fn at_storage_precision(self) -> FieldValue {
        match self {
            FieldValue::Timestamp(v) => FieldValue::Timestamp(v.with_nanosecond(0).unwrap_or(v)),
            other => other,
        }
    }

    /// Equality as used by filters: a plain integer matches a present
    /// optional integer, everything else must agree exactly.
    pub fn matches(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::OptionalInteger(Some(b)))
            | (FieldValue::OptionalInteger(Some(a)), FieldValue::Integer(b)) => a == b,
            (FieldValue::Integer(a), FieldValue::Real(b))
            | (FieldValue::Real(b), FieldValue::Integer(a)) => *a as f64 == *b,
            _ => self == other,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::OptionalInteger(Some(v)) => write!(f, "{v}"),
            FieldValue::OptionalInteger(None) => write!(f, "NULL"),
            FieldValue::Text(v) => write!(f, "{v:?}"),
            FieldValue::Real(v) => write!(f, "{v}"),
            FieldValue::Timestamp(v) => write!(f, "{}", v.format(TIMESTAMP_FORMAT)),
            FieldValue::Boolean(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(v: Option<i64>) -> Self {
        FieldValue::OptionalInteger(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Real(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

/// A plain data entity with a synthetic integer primary key.
///
/// `pk == 0` means the record has not been persisted yet.
pub trait Record: Clone + fmt::Debug {
    const TABLE: &'static str;

    /// Every field except `pk`, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    fn pk(&self) -> i64;

    fn set_pk(&mut self, pk: i64);

    /// Field values in the same order as `FIELDS`.
    fn values(&self) -> Vec<FieldValue>;

    /// Rebuilds a record from its pk and a full set of field values.
    fn from_values(pk: i64, values: Vec<FieldValue>) -> Result<Self>;

    fn is_persisted(&self) -> bool {
        self.pk() != 0
    }

    fn field_index(name: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|f| f.name == name)
    }
}

/// Maps every declared field of `T` to its column, failing on the first
/// field whose type has no column representation.
pub fn column_mappings<T: Record>() -> Result<Vec<ColumnMapping>> {
    T::FIELDS
        .iter()
        .map(|field| {
            field
                .ty
                .column_mapping()
                .ok_or(BookkeeperError::UnsupportedType {
                    table: T::TABLE,
                    field: field.name,
                    ty: field.ty,
                })
        })
        .collect()
}

/// Reads field values in declaration order while rebuilding a record.
pub struct FieldReader {
    table: &'static str,
    fields: std::slice::Iter<'static, FieldDescriptor>,
    values: std::vec::IntoIter<FieldValue>,
}

impl FieldReader {
    pub fn new<T: Record>(values: Vec<FieldValue>) -> Result<Self> {
        if values.len() != T::FIELDS.len() {
            return Err(BookkeeperError::Decode {
                table: T::TABLE,
                field: PK_COLUMN,
                reason: format!("expected {} values, got {}", T::FIELDS.len(), values.len()),
            });
        }
        Ok(Self {
            table: T::TABLE,
            fields: T::FIELDS.iter(),
            values: values.into_iter(),
        })
    }

    fn next(&mut self) -> Result<(&'static str, FieldValue)> {
        match (self.fields.next(), self.values.next()) {
            (Some(field), Some(value)) => Ok((field.name, value)),
            _ => Err(BookkeeperError::Decode {
                table: self.table,
                field: PK_COLUMN,
                reason: "ran out of values".to_string(),
            }),
        }
    }

    fn mismatch(&self, field: &'static str, expected: &str, got: &FieldValue) -> BookkeeperError {
        BookkeeperError::Decode {
            table: self.table,
            field,
            reason: format!("expected {expected}, got {:?}", got.semantic_type()),
        }
    }

    pub fn integer(&mut self) -> Result<i64> {
        match self.next()? {
            (_, FieldValue::Integer(v)) => Ok(v),
            (field, other) => Err(self.mismatch(field, "integer", &other)),
        }
    }

    #[cfg(test)]
    pub fn optional_integer(&mut self) -> Result<Option<i64>> {
        match self.next()? {
            (_, FieldValue::OptionalInteger(v)) => Ok(v),
            (_, FieldValue::Integer(v)) => Ok(Some(v)),
            (field, other) => Err(self.mismatch(field, "optional integer", &other)),
        }
    }

    pub fn text(&mut self) -> Result<String> {
        match self.next()? {
            (_, FieldValue::Text(v)) => Ok(v),
            (field, other) => Err(self.mismatch(field, "text", &other)),
        }
    }

    pub fn real(&mut self) -> Result<f64> {
        match self.next()? {
            (_, FieldValue::Real(v)) => Ok(v),
            (_, FieldValue::Integer(v)) => Ok(v as f64),
            (field, other) => Err(self.mismatch(field, "real", &other)),
        }
    }

    pub fn timestamp(&mut self) -> Result<NaiveDateTime> {
        match self.next()? {
            (_, FieldValue::Timestamp(v)) => Ok(v),
            (field, other) => Err(self.mismatch(field, "timestamp", &other)),
        }
    }
}

/// Conjunction of `field = value` terms consumed by `Repository::get_all`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<(String, FieldValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Checks every term names a declared field of `T` and returns the
    /// matching field descriptors alongside their required values.
    pub fn resolve<T: Record>(&self) -> Result<Vec<(usize, &'static FieldDescriptor, &FieldValue)>> {
        self.terms
            .iter()
            .map(|(name, value)| {
                let idx = T::field_index(name).ok_or_else(|| BookkeeperError::UnknownField {
                    table: T::TABLE,
                    field: name.clone(),
                })?;
                let field = &T::FIELDS[idx];
                if !value.fits(field.ty) {
                    return Err(BookkeeperError::FilterType {
                        table: T::TABLE,
                        field: field.name,
                        expected: field.ty,
                        got: value.semantic_type(),
                    });
                }
                Ok((idx, field, value))
            })
            .collect()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}
