use chrono::NaiveDateTime;

use crate::error::Result;
use crate::record::{FieldDescriptor, FieldReader, FieldValue, Record, SemanticType};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Category {
    pub name: String,
    pub pk: i64,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pk: 0,
        }
    }
}

impl Record for Category {
    const TABLE: &'static str = "Category";
    const FIELDS: &'static [FieldDescriptor] = &[FieldDescriptor::new("name", SemanticType::Text)];

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![self.name.clone().into()]
    }

    fn from_values(pk: i64, values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new::<Self>(values)?;
        Ok(Self {
            name: r.text()?,
            pk,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub amount: f64,
    pub category_pk: i64,
    pub expense_date: NaiveDateTime,
    pub comment: String,
    pub pk: i64,
}

impl Expense {
    pub fn new(amount: f64, category_pk: i64, expense_date: NaiveDateTime) -> Self {
        Self {
            amount,
            category_pk,
            expense_date,
            comment: String::new(),
            pk: 0,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl Record for Expense {
    const TABLE: &'static str = "Expense";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("amount", SemanticType::Real),
        FieldDescriptor::new("category_pk", SemanticType::Integer),
        FieldDescriptor::new("expense_date", SemanticType::Timestamp),
        FieldDescriptor::new("comment", SemanticType::Text),
    ];

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.amount.into(),
            self.category_pk.into(),
            self.expense_date.into(),
            self.comment.clone().into(),
        ]
    }

    fn from_values(pk: i64, values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new::<Self>(values)?;
        Ok(Self {
            amount: r.real()?,
            category_pk: r.integer()?,
            expense_date: r.timestamp()?,
            comment: r.text()?,
            pk,
        })
    }
}

/// Spending limit over a period of `term` days, optionally scoped to a category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Budget {
    pub summa: f64,
    pub term: i64,
    pub category: String,
    pub pk: i64,
}

impl Budget {
    pub fn new(summa: f64, term: i64) -> Self {
        Self {
            summa,
            term,
            category: String::new(),
            pk: 0,
        }
    }
}

impl Record for Budget {
    const TABLE: &'static str = "Budget";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("summa", SemanticType::Real),
        FieldDescriptor::new("term", SemanticType::Integer),
        FieldDescriptor::new("category", SemanticType::Text),
    ];

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.summa.into(),
            self.term.into(),
            self.category.clone().into(),
        ]
    }

    fn from_values(pk: i64, values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new::<Self>(values)?;
        Ok(Self {
            summa: r.real()?,
            term: r.integer()?,
            category: r.text()?,
            pk,
        })
    }
}
