use predicates::str::contains;
use std::fs;

mod common;
use common::{flt, init_db_with_data, kv_dir, setup_test_db};

#[test]
fn test_snapshot_create_and_status() {
    let db_path = setup_test_db("snap_create");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "snapshot", "--create"])
        .assert()
        .success()
        .stdout(contains("Snapshot written"));

    flt()
        .args(["--db", &db_path, "snapshot", "--status"])
        .assert()
        .success()
        .stdout(contains("Snapshot taken at"))
        .stdout(contains("1 uro, 1 hydro, 1 kegel"));
}

#[test]
fn test_snapshot_refuses_empty_database() {
    let db_path = setup_test_db("snap_empty");

    flt()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    flt()
        .args(["--db", &db_path, "snapshot", "--create"])
        .assert()
        .success()
        .stdout(contains("Nothing to snapshot"));

    flt()
        .args(["--db", &db_path, "snapshot", "--status"])
        .assert()
        .success()
        .stdout(contains("No snapshot present"));
}

#[test]
fn test_snapshot_restore_only_into_empty_database() {
    let db_path = setup_test_db("snap_guard");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "snapshot", "--create"])
        .assert()
        .success();

    // Store still has data: restore is refused
    flt()
        .args(["--db", &db_path, "snapshot", "--restore"])
        .assert()
        .success()
        .stdout(contains("not empty"));
}

#[test]
fn test_startup_restores_after_database_loss() {
    let db_path = setup_test_db("snap_loss");
    init_db_with_data(&db_path);

    // Mutating commands refresh the snapshot, so one already exists.
    // Simulate losing the database file while the KV sidecar survives.
    fs::remove_file(&db_path).unwrap();

    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("Restored records from the auto-backup snapshot"))
        .stdout(contains("2025-06-01T08:00:00.000Z"));

    // The other collections came back too
    flt()
        .args(["--db", &db_path, "list", "kegel"])
        .assert()
        .success()
        .stdout(contains("2025-06-01T07:00:00.000Z"));

    assert!(kv_dir(&db_path).join("auto-backup.json").exists());
}
