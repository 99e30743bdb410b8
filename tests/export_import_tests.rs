use predicates::str::contains;
use std::fs;

mod common;
use common::{flt, init_db_with_data, setup_test_db, temp_out};

#[test]
fn test_export_json_document_shape() {
    let db_path = setup_test_db("export_json");
    let out = temp_out("export_json", "json");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "export", "--file", &out])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["version"], "3.0");
    assert_eq!(doc["data"]["uroLogs"].as_array().unwrap().len(), 1);
    assert_eq!(doc["data"]["hydroLogs"].as_array().unwrap().len(), 1);
    assert_eq!(doc["data"]["kegelLogs"].as_array().unwrap().len(), 1);
    assert!(doc["exportDate"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_export_refuses_overwrite_without_force() {
    let db_path = setup_test_db("export_force");
    let out = temp_out("export_force", "json");
    init_db_with_data(&db_path);

    fs::write(&out, "occupied").unwrap();

    flt()
        .args(["--db", &db_path, "export", "--file", &out])
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&out).unwrap(), "occupied");

    flt()
        .args(["--db", &db_path, "export", "--file", &out, "--force"])
        .assert()
        .success();
    assert_ne!(fs::read_to_string(&out).unwrap(), "occupied");
}

#[test]
fn test_export_csv_contains_all_entries() {
    let db_path = setup_test_db("export_csv");
    let out = temp_out("export_csv", "csv");
    init_db_with_data(&db_path);

    flt()
        .args([
            "--db", &db_path, "export", "--file", &out, "--format", "csv",
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("uroLog"));
    assert!(content.contains("hydroLog"));
    assert!(content.contains("kegelLog"));
    // rows sorted by timestamp: kegel (07:00) before uro (08:00)
    let kegel_pos = content.find("kegelLog").unwrap();
    let uro_pos = content.find("uroLog").unwrap();
    assert!(kegel_pos < uro_pos);
}

#[test]
fn test_export_then_import_round_trip() {
    let source_db = setup_test_db("round_trip_src");
    let target_db = setup_test_db("round_trip_dst");
    let out = temp_out("round_trip", "json");
    init_db_with_data(&source_db);

    flt()
        .args(["--db", &source_db, "export", "--file", &out])
        .assert()
        .success();

    flt()
        .args(["--db", &target_db, "import", &out])
        .assert()
        .success()
        .stdout(contains("3 new record(s)"));

    flt()
        .args(["--db", &target_db, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("2025-06-01T08:00:00.000Z"));

    // Importing the same file again skips every record
    flt()
        .args(["--db", &target_db, "import", &out])
        .assert()
        .success()
        .stdout(contains("0 new record(s)"))
        .stdout(contains("3 duplicate(s) skipped"));
}

#[test]
fn test_import_replace_clears_existing_records() {
    let db_path = setup_test_db("import_replace");
    let out = temp_out("import_replace", "json");
    init_db_with_data(&db_path);

    fs::write(
        &out,
        r#"{"data": {"uroLogs": [
            {"timestamp": "2026-01-01T10:00:00.000Z", "volume": 100, "duration": 10}
        ]}}"#,
    )
    .unwrap();

    flt()
        .args(["--db", &db_path, "import", &out, "--replace", "--yes"])
        .assert()
        .success()
        .stdout(contains("Snapshot restored"));

    // The old uro log is gone, the imported one is in
    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("2026-01-01T10:00:00.000Z"))
        .stdout(contains("1 record(s)"));

    // Hydro was absent from the document, so it was left alone
    flt()
        .args(["--db", &db_path, "list", "hydro"])
        .assert()
        .success()
        .stdout(contains("2025-06-01T09:00:00.000Z"));
}

#[test]
fn test_import_rejects_malformed_document() {
    let db_path = setup_test_db("import_invalid");
    let out = temp_out("import_invalid", "json");
    init_db_with_data(&db_path);

    fs::write(&out, r#"{"somethingElse": true}"#).unwrap();

    flt()
        .args(["--db", &db_path, "import", &out])
        .assert()
        .failure()
        .stderr(contains("Invalid import document"));

    // Nothing was touched
    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("1 record(s)"));
}
