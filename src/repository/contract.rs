//! Behaviour every `Repository` implementation must share. Each backend's
//! tests call `run_all` with factories for fresh repository handles.
//!
//! Handles from one factory may share storage, so every check works relative
//! to what is already stored.

use crate::error::{BookkeeperError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{Budget, Category, Expense};
use crate::record::{FieldDescriptor, FieldReader, FieldValue, Filter, Record, SemanticType};

use super::Repository;

/// Declares a field type with no column mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct WithFlag {
    pub enabled: bool,
    pub pk: i64,
}

impl Record for WithFlag {
    const TABLE: &'static str = "WithFlag";
    const FIELDS: &'static [FieldDescriptor] = &[FieldDescriptor::new("enabled", SemanticType::Boolean)];

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![self.enabled.into()]
    }

    fn from_values(pk: i64, _values: Vec<FieldValue>) -> Result<Self> {
        Ok(Self { enabled: false, pk })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithParent {
    pub parent: Option<i64>,
    pub pk: i64,
}

impl Record for WithParent {
    const TABLE: &'static str = "WithParent";
    const FIELDS: &'static [FieldDescriptor] =
        &[FieldDescriptor::new("parent", SemanticType::OptionalInteger)];

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![self.parent.into()]
    }

    fn from_values(pk: i64, values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new::<Self>(values)?;
        Ok(Self {
            parent: r.optional_integer()?,
            pk,
        })
    }
}

pub fn run_all<C, B, E>(categories: impl Fn() -> C, budgets: impl Fn() -> B, expenses: impl Fn() -> E)
where
    C: Repository<Category>,
    B: Repository<Budget>,
    E: Repository<Expense>,
{
    add_assigns_pk_and_get_returns_equal(&categories(), &budgets());
    add_rejects_persisted_record(&categories());
    get_missing_is_none(&categories());
    update_overwrites_fields(&budgets());
    update_rejects_unsaved_and_missing(&budgets());
    delete_removes_row(&categories());
    get_all_filters_by_name(&categories());
    get_all_conjunction(&budgets());
    get_all_rejects_bad_filters(&budgets());
    get_all_keeps_pk_order(&categories());
    timestamps_round_trip_at_second_granularity(&expenses());
    get_all_filters_by_timestamp_and_category(&expenses());
}

fn add_assigns_pk_and_get_returns_equal(cats: &impl Repository<Category>, budgets: &impl Repository<Budget>) {
    let mut cat = Category::new("Транспорт");
    let pk = cats.add(&mut cat).unwrap();
    assert!(pk > 0);
    assert_eq!(cat.pk, pk);
    assert_eq!(cats.get(pk).unwrap(), Some(cat));

    let mut budget = Budget {
        summa: 5000.0,
        term: 7,
        category: "Продукты".into(),
        pk: 0,
    };
    let pk = budgets.add(&mut budget).unwrap();
    assert_eq!(budgets.get(pk).unwrap(), Some(budget));
}

fn add_rejects_persisted_record(cats: &impl Repository<Category>) {
    let before = cats.get_all(None).unwrap().len();
    let mut cat = Category {
        name: "Подарки".into(),
        pk: 42,
    };
    let err = cats.add(&mut cat).unwrap_err();
    assert!(matches!(err, BookkeeperError::InvalidState(_)));
    assert_eq!(cat.pk, 42);
    assert_eq!(cats.get_all(None).unwrap().len(), before);
}

fn get_missing_is_none(cats: &impl Repository<Category>) {
    assert_eq!(cats.get(i64::MAX).unwrap(), None);
}

fn update_overwrites_fields(budgets: &impl Repository<Budget>) {
    let mut budget = Budget::new(1000.0, 1);
    let pk = budgets.add(&mut budget).unwrap();
    budget.summa = 1500.0;
    budget.category = "Дом".into();
    budgets.update(&budget).unwrap();
    let fetched = budgets.get(pk).unwrap().unwrap();
    assert_eq!(fetched.summa, 1500.0);
    assert_eq!(fetched.term, 1);
    assert_eq!(fetched.category, "Дом");
}

fn update_rejects_unsaved_and_missing(budgets: &impl Repository<Budget>) {
    let err = budgets.update(&Budget::new(10.0, 1)).unwrap_err();
    assert!(matches!(err, BookkeeperError::InvalidState(_)));

    let before = budgets.get_all(None).unwrap();
    let ghost = Budget {
        pk: i64::MAX,
        ..Budget::new(10.0, 1)
    };
    let err = budgets.update(&ghost).unwrap_err();
    assert!(matches!(err, BookkeeperError::NotFound { table: "Budget", pk: i64::MAX }));
    assert_eq!(budgets.get_all(None).unwrap(), before);
}

fn delete_removes_row(cats: &impl Repository<Category>) {
    let pk = cats.add(&mut Category::new("Удалить")).unwrap();
    cats.delete(pk).unwrap();
    assert_eq!(cats.get(pk).unwrap(), None);

    let err = cats.delete(pk).unwrap_err();
    assert!(matches!(err, BookkeeperError::NotFound { table: "Category", .. }));
}

fn get_all_filters_by_name(cats: &impl Repository<Category>) {
    let existing = cats
        .get_all(Some(&Filter::new().eq("name", "Дом")))
        .unwrap()
        .len();
    cats.add(&mut Category::new("Дом")).unwrap();
    cats.add(&mut Category::new("Дача")).unwrap();
    cats.add(&mut Category::new("Дом")).unwrap();

    let found = cats.get_all(Some(&Filter::new().eq("name", "Дом"))).unwrap();
    assert_eq!(found.len(), existing + 2);
    assert!(found.iter().all(|c| c.name == "Дом"));

    let none = cats.get_all(Some(&Filter::new().eq("name", "Нет такой"))).unwrap();
    assert!(none.is_empty());
}

fn get_all_conjunction(budgets: &impl Repository<Budget>) {
    let mut week = Budget {
        summa: 3000.0,
        term: 7,
        category: "Кафе".into(),
        pk: 0,
    };
    budgets.add(&mut week).unwrap();
    budgets
        .add(&mut Budget {
            summa: 10000.0,
            term: 31,
            category: "Кафе".into(),
            pk: 0,
        })
        .unwrap();

    let filter = Filter::new().eq("category", "Кафе").eq("term", 7_i64);
    assert_eq!(budgets.get_all(Some(&filter)).unwrap(), vec![week]);

    let by_amount = Filter::new().eq("summa", 10000.0).eq("category", "Кафе");
    assert_eq!(budgets.get_all(Some(&by_amount)).unwrap().len(), 1);

    let empty = Filter::new();
    assert_eq!(
        budgets.get_all(Some(&empty)).unwrap(),
        budgets.get_all(None).unwrap()
    );
}

fn get_all_rejects_bad_filters(budgets: &impl Repository<Budget>) {
    let err = budgets
        .get_all(Some(&Filter::new().eq("pk; DROP TABLE Budget", 1_i64)))
        .unwrap_err();
    assert!(matches!(err, BookkeeperError::UnknownField { table: "Budget", .. }));

    let err = budgets
        .get_all(Some(&Filter::new().eq("term", "seven")))
        .unwrap_err();
    assert!(matches!(err, BookkeeperError::FilterType { field: "term", .. }));
}

fn get_all_keeps_pk_order(cats: &impl Repository<Category>) {
    for name in ["Я", "А", "М"] {
        cats.add(&mut Category::new(name)).unwrap();
    }
    let pks: Vec<i64> = cats.get_all(None).unwrap().iter().map(|c| c.pk).collect();
    let mut sorted = pks.clone();
    sorted.sort_unstable();
    assert_eq!(pks, sorted);
}

fn at(h: u32, min: u32, s: u32, milli: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_milli_opt(h, min, s, milli)
        .unwrap()
}

fn timestamps_round_trip_at_second_granularity(expenses: &impl Repository<Expense>) {
    let mut expense = Expense::new(12.5, 1, at(8, 30, 15, 750)).with_comment("кофе");
    let pk = expenses.add(&mut expense).unwrap();
    let stored = expenses.get(pk).unwrap().unwrap();
    assert_eq!(stored.expense_date, at(8, 30, 15, 0));
    assert_eq!(stored.amount, 12.5);
    assert_eq!(stored.comment, "кофе");

    expense.expense_date = at(9, 0, 1, 999);
    expenses.update(&expense).unwrap();
    assert_eq!(expenses.get(pk).unwrap().unwrap().expense_date, at(9, 0, 1, 0));
}

fn get_all_filters_by_timestamp_and_category(expenses: &impl Repository<Expense>) {
    let when = at(18, 45, 30, 250) + Duration::days(3);
    let whole = when - Duration::milliseconds(250);
    let category_pk = 7_000_i64;
    let mut first = Expense::new(10.0, category_pk, when);
    expenses.add(&mut first).unwrap();
    expenses.add(&mut Expense::new(20.0, category_pk + 1, when)).unwrap();
    expenses
        .add(&mut Expense::new(30.0, category_pk, when + Duration::seconds(1)))
        .unwrap();

    let by_second = Filter::new().eq("expense_date", whole);
    assert_eq!(expenses.get_all(Some(&by_second)).unwrap().len(), 2);

    let by_exact = Filter::new().eq("expense_date", when);
    assert_eq!(expenses.get_all(Some(&by_exact)).unwrap().len(), 2);

    let filter = Filter::new().eq("category_pk", category_pk).eq("expense_date", whole);
    let found = expenses.get_all(Some(&filter)).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].pk, first.pk);
    assert_eq!(found[0].amount, 10.0);
}
