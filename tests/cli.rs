use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn budget(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("budget").unwrap();
    cmd.env("MONTHLY_BUDGET_DATA_DIR", dir.path())
        .env_remove("BUDGET_USER");
    cmd
}

fn setup_alice(dir: &TempDir) {
    budget(dir).arg("init").assert().success();
    budget(dir)
        .args(["user", "register", "Alice", "--email", "alice@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set as default user"));
    budget(dir)
        .args(["budget", "create", "--total", "1000", "--start", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-01 to 2025-01-31"));
}

#[test]
fn test_requires_registered_user() {
    let dir = TempDir::new().unwrap();
    budget(&dir)
        .args(["budget", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user selected"));

    budget(&dir)
        .args(["--user", "ghost@example.com", "budget", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_register_collects_errors() {
    let dir = TempDir::new().unwrap();
    budget(&dir)
        .args(["user", "register", " ", "--email", "not-an-email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Full name is required"))
        .stderr(predicate::str::contains("Please enter a valid email address"));
}

#[test]
fn test_expense_updates_summaries() {
    let dir = TempDir::new().unwrap();
    setup_alice(&dir);

    budget(&dir)
        .args(["category", "add", "food", "--allocated", "300", "--budget", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food & Dining"));

    budget(&dir)
        .args([
            "txn", "add", "200", "--category", "food", "--date", "2025-01-05", "--budget",
            "2025-01-01",
        ])
        .assert()
        .success();

    budget(&dir)
        .args(["summary", "daily", "--budget", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-05"))
        .stdout(predicate::str::contains("-$200.00"));

    budget(&dir)
        .args(["summary", "monthly", "--budget", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$800.00"))
        .stdout(predicate::str::contains("80.00%"));

    budget(&dir)
        .args(["category", "list", "--summary", "--budget", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$100.00"))
        .stdout(predicate::str::contains("66.67%"));

    budget(&dir)
        .args(["audit", "--limit", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice@example.com"));
}

#[test]
fn test_zero_amount_is_rejected() {
    let dir = TempDir::new().unwrap();
    setup_alice(&dir);

    budget(&dir)
        .args(["txn", "add", "0", "--budget", "2025-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_other_users_budget_is_hidden() {
    let dir = TempDir::new().unwrap();
    setup_alice(&dir);

    budget(&dir)
        .args(["user", "register", "Bob", "--email", "bob@example.com"])
        .assert()
        .success();

    budget(&dir)
        .args(["--user", "bob@example.com", "budget", "show", "2025-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    budget(&dir)
        .args(["--user", "bob@example.com", "budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-01").not());
}

#[test]
fn test_goal_progress() {
    let dir = TempDir::new().unwrap();
    setup_alice(&dir);

    budget(&dir)
        .args(["goal", "add", "Emergency fund", "--target", "5000", "--date", "2030-01-01"])
        .assert()
        .success();

    budget(&dir)
        .args(["goal", "progress", "Emergency fund", "1250"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25.00%"));

    budget(&dir)
        .args(["goal", "complete", "emergency fund"])
        .assert()
        .success();

    budget(&dir)
        .args(["goal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emergency fund"))
        .stdout(predicate::str::contains("yes"));
}

#[test]
fn test_deleting_budget_cascades() {
    let dir = TempDir::new().unwrap();
    setup_alice(&dir);

    budget(&dir)
        .args(["category", "setup", "--budget", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 9 categories"));

    budget(&dir)
        .args(["txn", "add", "50", "--date", "2025-01-02", "--budget", "2025-01-01"])
        .assert()
        .success();

    budget(&dir)
        .args(["budget", "delete", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 9 categories, 1 transactions"));

    budget(&dir)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-01").not());
}

#[test]
fn test_output_follows_configured_currency_and_dates() {
    let dir = TempDir::new().unwrap();
    setup_alice(&dir);

    std::fs::write(
        dir.path().join("config.json"),
        r#"{"currency_symbol": "€", "date_format": "%d/%m/%Y", "default_user": "alice@example.com"}"#,
    )
    .unwrap();

    budget(&dir)
        .args(["txn", "add", "200", "--date", "2025-01-05", "--budget", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€200.00"))
        .stdout(predicate::str::contains("05/01/2025"));

    budget(&dir)
        .args(["budget", "show", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("01/01/2025 to 31/01/2025"))
        .stdout(predicate::str::contains("€800.00"))
        .stdout(predicate::str::contains("$").not());
}
