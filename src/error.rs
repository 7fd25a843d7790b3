use thiserror::Error;

use crate::record::SemanticType;

#[derive(Error, Debug)]
pub enum BookkeeperError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No {table} with pk {pk}")]
    NotFound { table: &'static str, pk: i64 },

    #[error("Field {table}.{field} has unsupported type {ty:?}")]
    UnsupportedType {
        table: &'static str,
        field: &'static str,
        ty: SemanticType,
    },

    #[error("{what} must be a finite number, got {value}")]
    InvalidAmount { what: &'static str, value: f64 },

    #[error("Expected exactly one category named {name:?}, found {matches}")]
    Ambiguity { name: String, matches: usize },

    #[error("{table} has no field {field:?}")]
    UnknownField { table: &'static str, field: String },

    #[error("Filter on {table}.{field} expects {expected:?}, got {got:?}")]
    FilterType {
        table: &'static str,
        field: &'static str,
        expected: SemanticType,
        got: SemanticType,
    },

    #[error("Cannot decode {table}.{field}: {reason}")]
    Decode {
        table: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BookkeeperError>;
