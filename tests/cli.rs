use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tally(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("TALLY_DATA_DIR", data_dir).env_remove("RUST_LOG");
    cmd
}

fn write_source(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

const RENT_AND_SALARY: &str =
    "title, kind, value, category\nrent, outcome, 500, Housing\nsalary, income, 2000, Job\n";

#[test]
fn import_then_balance() {
    let data = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    let source = write_source(uploads.path(), "batch.csv", RENT_AND_SALARY);

    tally(data.path())
        .arg("import")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 transaction(s)."));

    // Read in place, so the file stays
    assert!(source.exists());

    tally(data.path())
        .arg("balance")
        .assert()
        .success()
        .stdout(predicate::str::contains("$2000.00"))
        .stdout(predicate::str::contains("$500.00"))
        .stdout(predicate::str::contains("$1500.00"));

    tally(data.path())
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Housing"))
        .stdout(predicate::str::contains("Job"));
}

#[test]
fn import_remove_source_deletes_file() {
    let data = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    let source = write_source(uploads.path(), "upload.csv", RENT_AND_SALARY);

    tally(data.path())
        .arg("import")
        .arg(&source)
        .arg("--remove-source")
        .assert()
        .success();

    assert!(!source.exists());
}

#[test]
fn malformed_import_persists_nothing() {
    let data = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    let source = write_source(
        uploads.path(),
        "bad.csv",
        "title, kind, value, category\nrent, outcome, 500, Housing\nsalary, bonus, 2000, Job\n",
    );

    tally(data.path())
        .arg("import")
        .arg(&source)
        .arg("--remove-source")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));

    assert!(!source.exists());

    tally(data.path())
        .args(["transaction", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn outcome_over_balance_is_rejected() {
    let data = TempDir::new().unwrap();

    tally(data.path())
        .args(["transaction", "add", "Salary", "30", "income", "--category", "Job"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created transaction: Salary"));

    tally(data.path())
        .args(["txn", "add", "TV", "50", "outcome", "--category", "Electronics"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Insufficient balance: need $50.00, have $30.00",
        ));

    tally(data.path())
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Electronics").not());
}

#[test]
fn add_rejects_bad_input() {
    let data = TempDir::new().unwrap();

    tally(data.path())
        .args(["transaction", "add", "Salary", "12.345", "income", "--category", "Job"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));

    tally(data.path())
        .args(["transaction", "add", "Salary", "12", "gift", "--category", "Job"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown transaction kind"));
}

#[test]
fn help_states_decimal_limit() {
    let data = TempDir::new().unwrap();

    tally(data.path())
        .args(["import", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two decimal places"));

    tally(data.path())
        .args(["transaction", "add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two decimal places"));
}

#[test]
fn list_as_json() {
    let data = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    let source = write_source(uploads.path(), "batch.csv", RENT_AND_SALARY);
    tally(data.path()).arg("import").arg(&source).assert().success();

    let output = tally(data.path())
        .args(["transaction", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(snapshot["transactions"][0]["title"], "rent");
    assert_eq!(snapshot["balance"]["income"], 200000);
    assert_eq!(snapshot["balance"]["outcome"], 50000);
    assert_eq!(snapshot["balance"]["total"], 150000);
}

#[test]
fn delete_by_id() {
    let data = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    let source = write_source(uploads.path(), "batch.csv", RENT_AND_SALARY);
    tally(data.path()).arg("import").arg(&source).assert().success();

    let output = tally(data.path())
        .args(["transaction", "list", "--format", "json"])
        .output()
        .unwrap();
    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rent_id = snapshot["transactions"][0]["id"].as_str().unwrap().to_string();

    tally(data.path())
        .args(["transaction", "delete", &rent_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted transaction: rent"));

    tally(data.path())
        .arg("balance")
        .assert()
        .success()
        .stdout(predicate::str::contains("$2000.00"));

    tally(data.path())
        .args(["transaction", "delete", &rent_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transaction not found"));
}

#[test]
fn export_yaml_to_file() {
    let data = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    let source = write_source(uploads.path(), "batch.csv", RENT_AND_SALARY);
    tally(data.path()).arg("import").arg(&source).assert().success();

    let out = uploads.path().join("ledger.yaml");
    tally(data.path())
        .args(["export", "--format", "yaml", "--output"])
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# Tally ledger export"));
    assert!(text.contains("total: 150000"));
}

#[test]
fn init_creates_data_files() {
    let data = TempDir::new().unwrap();

    tally(data.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(data.path().join("config.json").exists());
    assert!(data.path().join("data").join("transactions.json").exists());
    assert!(data.path().join("data").join("categories.json").exists());

    tally(data.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized:      true"));
}
