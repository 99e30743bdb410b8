use predicates::str::contains;

mod common;
use common::{flt, init_db_with_data, setup_test_db};

/// Insert a raw duplicate row, bypassing the insert-path uniqueness guard
fn inject_duplicate_uro(db_path: &str, timestamp: &str, volume: f64) {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.execute(
        "INSERT INTO uro_logs (timestamp, volume, duration, flow_rate, color, urgency, concerns, notes, is_demo)
         VALUES (?1, ?2, 10, 0, '', '', '[]', NULL, 0)",
        rusqlite::params![timestamp, volume],
    )
    .expect("insert duplicate");
}

#[test]
fn test_check_reports_clean_database() {
    let db_path = setup_test_db("check_clean");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("SQLite integrity check passed"))
        .stdout(contains("No duplicate timestamps"));
}

#[test]
fn test_check_flags_duplicates_and_repair_removes_them() {
    let db_path = setup_test_db("check_repair");
    init_db_with_data(&db_path);

    inject_duplicate_uro(&db_path, "2025-06-01T08:00:00.000Z", 500.0);
    inject_duplicate_uro(&db_path, "2025-06-01T08:00:00.000Z", 999.0);

    flt()
        .args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Duplicate timestamps found"))
        .stdout(contains("2 uro"));

    flt()
        .args(["--db", &db_path, "db", "--repair"])
        .assert()
        .success()
        .stdout(contains("Removed 2 duplicate record(s)"))
        .stdout(contains("most recently stored record was kept"));

    // The survivor is the last write
    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("999"))
        .stdout(contains("1 record(s)"));

    flt()
        .args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("No duplicate timestamps"));
}

#[test]
fn test_repair_on_clean_database_is_a_no_op() {
    let db_path = setup_test_db("repair_noop");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "db", "--repair"])
        .assert()
        .success()
        .stdout(contains("Nothing to repair"));
}

#[test]
fn test_db_info_and_vacuum() {
    let db_path = setup_test_db("db_info");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("uro_logs"))
        .stdout(contains("hydro_logs"))
        .stdout(contains("kegel_logs"));

    flt()
        .args(["--db", &db_path, "db", "--vacuum"])
        .assert()
        .success()
        .stdout(contains("Vacuum completed"));
}

#[test]
fn test_db_migrate_is_idempotent() {
    let db_path = setup_test_db("db_migrate");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Migration completed"));

    flt()
        .args(["--db", &db_path, "db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Migration completed"));

    flt()
        .args(["--db", &db_path, "list", "uro"])
        .assert()
        .success()
        .stdout(contains("1 record(s)"));
}
