//! End-to-end tests for the `splitter` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn splitter(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitter").unwrap();
    cmd.env("BILL_SPLITTER_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn run(data_dir: &TempDir, args: &[&str]) {
    splitter(data_dir).args(args).assert().success();
}

fn seed_roommates(data_dir: &TempDir) {
    for name in ["A", "B", "C"] {
        run(data_dir, &["user", "create", name]);
    }
    run(
        data_dir,
        &["group", "create", "Roommates", "--member", "A", "--member", "B"],
    );
}

#[test]
fn test_init_and_config() {
    let data_dir = TempDir::new().unwrap();

    splitter(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("items.json").exists());

    splitter(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency symbol: $"));
}

#[test]
fn test_pizza_split() {
    let data_dir = TempDir::new().unwrap();
    seed_roommates(&data_dir);

    splitter(&data_dir)
        .args(["item", "create", "--group", "Roommates", "  pizza", "12.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created item: Pizza: $12.00"));

    run(&data_dir, &["item", "share", "--group", "Roommates", "Pizza", "A", "B"]);

    splitter(&data_dir)
        .args(["item", "share", "--group", "Roommates", "Pizza", "C"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Users is not a member of the item's group",
        ));

    splitter(&data_dir)
        .args(["item", "show", "--group", "Roommates", "pizza"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shared by: 2"))
        .stdout(predicate::str::contains("$6.00"));

    splitter(&data_dir)
        .args(["group", "balances", "Roommates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$6.00"));
}

#[test]
fn test_item_validation_errors() {
    let data_dir = TempDir::new().unwrap();
    seed_roommates(&data_dir);

    splitter(&data_dir)
        .args(["item", "create", "--group", "Roommates", "soda", "-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cost is not a valid currency amount"));

    splitter(&data_dir)
        .args([
            "item",
            "create",
            "--group",
            "Roommates",
            "an extremely long item name",
            "3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Name is too long (maximum is 20 characters)",
        ));

    splitter(&data_dir)
        .args(["group", "show", "Roommates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no items)"));
}

#[test]
fn test_unshare_and_delete() {
    let data_dir = TempDir::new().unwrap();
    seed_roommates(&data_dir);
    run(&data_dir, &["item", "create", "--group", "Roommates", "rent", "900"]);
    run(&data_dir, &["item", "share", "--group", "Roommates", "rent", "A", "B"]);

    run(&data_dir, &["item", "unshare", "--group", "Roommates", "rent", "B"]);
    // unsharing again is a no-op
    run(&data_dir, &["item", "unshare", "--group", "Roommates", "rent", "B"]);

    splitter(&data_dir)
        .args(["group", "show-user", "Roommates", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$900.00"));

    run(&data_dir, &["item", "delete", "--group", "Roommates", "rent"]);

    splitter(&data_dir)
        .args(["item", "show", "--group", "Roommates", "rent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item not found"));
}

#[test]
fn test_membership_commands() {
    let data_dir = TempDir::new().unwrap();
    seed_roommates(&data_dir);

    run(&data_dir, &["group", "add-user", "Roommates", "C"]);
    run(&data_dir, &["group", "remove-user", "Roommates", "A"]);

    splitter(&data_dir)
        .args(["group", "show-user", "Roommates", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Member not found"));

    splitter(&data_dir)
        .args(["user", "show", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groups:  Roommates"));
}

#[test]
fn test_routes_command() {
    let data_dir = TempDir::new().unwrap();

    splitter(&data_dir)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/groups/:group_id/items/:item_id/users"));

    splitter(&data_dir)
        .args(["routes", "--resolve", "GET /groups/new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("groups#new"));

    splitter(&data_dir)
        .args(["routes", "--resolve", "GET /groups/1/items"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Route not found"));
}

#[test]
fn test_audit_command() {
    let data_dir = TempDir::new().unwrap();

    splitter(&data_dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries yet."));

    seed_roommates(&data_dir);

    splitter(&data_dir)
        .args(["audit", "--limit", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Group"))
        .stdout(predicate::str::contains("CREATE Membership"));
}
