use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{flt, kv_dir, setup_test_db};

fn seed_legacy_blob(db_path: &str, content: &str) {
    let dir = kv_dir(db_path);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("legacy-entries.json"), content).unwrap();
}

#[test]
fn test_legacy_blob_is_split_into_uro_and_hydro() {
    let db_path = setup_test_db("legacy_split");
    seed_legacy_blob(
        &db_path,
        r#"[
            {"timestamp": "2024-05-01T08:00:00.000Z", "volume": 300, "duration": 30,
             "fluidIntake": {"type": "Coffee", "amount": 200, "unit": "mL"}},
            {"timestamp": "2024-05-01T12:00:00.000Z", "volume": 150, "duration": 20}
        ]"#,
    );

    // Any data-touching command triggers the migration at startup
    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("Migrated 2 legacy entries"))
        .stdout(contains("2024-05-01T08:00:00.000Z"))
        .stdout(contains("2024-05-01T12:00:00.000Z"));

    // The embedded fluid intake became a companion hydro log
    flt()
        .args(["--db", &db_path, "list", "hydro"])
        .assert()
        .success()
        .stdout(contains("2024-05-01T08:00:00.000Z"))
        .stdout(contains("Coffee"));

    // The blob is consumed, so a second run does not migrate again
    assert!(!kv_dir(&db_path).join("legacy-entries.json").exists());
    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("Migrated").not());
}

#[test]
fn test_legacy_duplicate_timestamps_are_perturbed() {
    let db_path = setup_test_db("legacy_dup");
    seed_legacy_blob(
        &db_path,
        r#"[
            {"timestamp": "2024-05-01T08:00:00.000Z", "volume": 300, "duration": 30},
            {"timestamp": "2024-05-01T08:00:00.000Z", "volume": 280, "duration": 28}
        ]"#,
    );

    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("2024-05-01T08:00:00.000Z"))
        .stdout(contains("2024-05-01T08:00:00.001Z"))
        .stdout(contains("2 record(s)"));
}

#[test]
fn test_unparseable_legacy_blob_is_left_in_place() {
    let db_path = setup_test_db("legacy_bad");
    seed_legacy_blob(&db_path, "{ not json ]");

    // The command still succeeds; the migration failure is only a warning
    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("Legacy entries migration failed"));

    // The blob survives for a later (fixed) attempt
    assert!(kv_dir(&db_path).join("legacy-entries.json").exists());
}

#[test]
fn test_legacy_blob_skipped_when_store_already_populated() {
    let db_path = setup_test_db("legacy_populated");

    flt()
        .args([
            "--db",
            &db_path,
            "add",
            "uro",
            "--at",
            "2025-06-01T08:00:00.000Z",
            "--volume",
            "250",
            "--duration",
            "25",
        ])
        .assert()
        .success();

    seed_legacy_blob(
        &db_path,
        r#"[{"timestamp": "2024-05-01T08:00:00.000Z", "volume": 300, "duration": 30}]"#,
    );

    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("skipping migration"))
        .stdout(contains("1 record(s)"));

    assert!(kv_dir(&db_path).join("legacy-entries.json").exists());
}
