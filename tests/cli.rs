use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bookkeeper").unwrap();
        cmd.env("BOOKKEEPER_DB", self.dir.path().join("test.db"))
            .env("BOOKKEEPER_CONFIG_DIR", self.dir.path().join("config"))
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.cmd().args(args).assert()
    }
}

#[test]
fn test_status_seeds_defaults() {
    let env = Env::new();
    env.run(&["status"])
        .success()
        .stdout(predicate::str::contains("Транспорт"))
        .stdout(predicate::str::contains("Продукты"))
        .stdout(predicate::str::contains("10 000.00"))
        .stdout(predicate::str::contains("No expenses."));
}

#[test]
fn test_added_expense_counts_toward_today() {
    let env = Env::new();
    env.run(&["expense", "add", "--amount", "150", "--category", "Дом", "--comment", "свет"])
        .success()
        .stdout(predicate::str::contains("Added expense 1"));
    env.run(&["expense", "add", "--amount", "70", "--category", "Дом", "--date", "2001-01-01"])
        .success();

    env.run(&["status"])
        .success()
        .stdout(predicate::str::is_match(r"Spent today:\s+150\.00").unwrap())
        .stdout(predicate::str::is_match(r"Spent this month:\s+150\.00").unwrap())
        .stdout(predicate::str::contains("2001-01-01 00:00:00"));
}

#[test]
fn test_unknown_category_is_rejected() {
    let env = Env::new();
    env.run(&["expense", "add", "--amount", "10", "--category", "Нет такой"])
        .failure()
        .stderr(predicate::str::contains("Expected exactly one category"));
    env.run(&["expense", "list"])
        .success()
        .stdout(predicate::str::contains("No expenses."));
}

#[test]
fn test_duplicate_category_blocks_delete() {
    let env = Env::new();
    env.run(&["category", "add", "Дом"]).success();
    env.run(&["category", "delete", "Дом"])
        .failure()
        .stderr(predicate::str::contains("found 2"));
    env.run(&["category", "delete", "Транспорт"]).success();
    env.run(&["category", "list"])
        .success()
        .stdout(predicate::str::contains("Транспорт").not());
}

#[test]
fn test_non_finite_amount_is_rejected() {
    let env = Env::new();
    env.run(&["expense", "add", "--amount", "NaN", "--category", "Дом"])
        .failure()
        .stderr(predicate::str::contains("must be a finite number"));
    env.run(&["expense", "list"])
        .success()
        .stdout(predicate::str::contains("No expenses."));
}

#[test]
fn test_change_missing_expense_reports_not_found() {
    let env = Env::new();
    env.run(&[
        "expense", "change", "--pk", "99", "--amount", "1", "--category", "Дом", "--date", "2024-01-01",
    ])
    .failure()
    .stderr(predicate::str::contains("No Expense with pk 99"));
}

#[test]
fn test_expense_list_by_category() {
    let env = Env::new();
    env.run(&["expense", "add", "--amount", "11", "--category", "Дом"]).success();
    env.run(&["expense", "add", "--amount", "22", "--category", "Транспорт"]).success();
    env.run(&["expense", "list", "--category", "Транспорт"])
        .success()
        .stdout(predicate::str::contains("22.00"))
        .stdout(predicate::str::contains("11.00").not());
}

#[test]
fn test_budget_set_keeps_term() {
    let env = Env::new();
    env.run(&["budget", "set", "--pk", "2", "--summa", "4500"])
        .success()
        .stdout(predicate::str::contains("4 500.00"))
        .stdout(predicate::str::contains("week"));
    env.run(&["budget", "set", "--pk", "42", "--summa", "1"])
        .failure()
        .stderr(predicate::str::contains("No Budget with pk 42"));
}

#[test]
fn test_init_writes_settings_and_database() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let config_dir = dir.path().join("config");
    Command::cargo_bin("bookkeeper")
        .unwrap()
        .env_remove("BOOKKEEPER_DB")
        .env("BOOKKEEPER_CONFIG_DIR", &config_dir)
        .args(["init", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready with 3 budgets and 3 categories."));
    assert!(config_dir.join("settings.json").exists());
    assert!(data_dir.join("bookkeeper.db").exists());
}

#[test]
fn test_demo_uses_memory_store() {
    let env = Env::new();
    env.run(&["demo"])
        .success()
        .stdout(predicate::str::contains("Demo data (in memory)"));
    assert!(!env.dir.path().join("test.db").exists());
}
