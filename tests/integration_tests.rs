use predicates::str::contains;

mod common;
use common::{flt, init_db_with_data, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init");

    flt()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_add_and_list_all_collections() {
    let db_path = setup_test_db("add_list");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("2025-06-01T08:00:00.000Z"));

    flt()
        .args(["--db", &db_path, "list", "hydro"])
        .assert()
        .success()
        .stdout(contains("Water"));

    flt()
        .args(["--db", &db_path, "list", "kegel"])
        .assert()
        .success()
        .stdout(contains("2025-06-01T07:00:00.000Z"));
}

#[test]
fn test_duplicate_timestamp_is_rejected() {
    let db_path = setup_test_db("dup_reject");
    init_db_with_data(&db_path);

    // Same timestamp in the same collection fails
    flt()
        .args([
            "--db",
            &db_path,
            "add",
            "uro",
            "--at",
            "2025-06-01T08:00:00.000Z",
            "--volume",
            "100",
            "--duration",
            "10",
        ])
        .assert()
        .failure()
        .stderr(contains("Duplicate timestamp"));

    // Same timestamp in a DIFFERENT collection is fine
    flt()
        .args([
            "--db",
            &db_path,
            "add",
            "kegel",
            "--at",
            "2025-06-01T08:00:00.000Z",
            "--reps",
            "5",
            "--hold",
            "3",
        ])
        .assert()
        .success();
}

#[test]
fn test_del_removes_entry_and_warns_on_missing() {
    let db_path = setup_test_db("del");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "del", "uro", "2025-06-01T08:00:00.000Z"])
        .assert()
        .success()
        .stdout(contains("Deleted"));

    // Deleting the same key again is not an error, just a warning
    flt()
        .args(["--db", &db_path, "del", "uro", "2025-06-01T08:00:00.000Z"])
        .assert()
        .success()
        .stdout(contains("No uro"));
}

#[test]
fn test_resource_add_list_del() {
    let db_path = setup_test_db("resources");

    flt()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    flt()
        .args([
            "--db",
            &db_path,
            "add",
            "resource",
            "--title",
            "NHS bladder overview",
            "--url",
            "https://example.org/bladder",
            "--category",
            "Education",
        ])
        .assert()
        .success()
        .stdout(contains("Resource saved"));

    let output = flt()
        .args(["--db", &db_path, "list", "resources"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NHS bladder overview"));

    // Pull the generated id out of the listing to delete it
    let id = stdout
        .lines()
        .find_map(|l| l.split_whitespace().find(|w| w.starts_with("res-")))
        .expect("resource id in listing")
        .to_string();

    flt()
        .args(["--db", &db_path, "del", "resource", &id])
        .assert()
        .success()
        .stdout(contains("Deleted resource"));
}

#[test]
fn test_invalid_timestamp_is_rejected() {
    let db_path = setup_test_db("bad_ts");

    flt()
        .args([
            "--db",
            &db_path,
            "add",
            "uro",
            "--at",
            "yesterday",
            "--volume",
            "100",
            "--duration",
            "10",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid timestamp"));
}
