use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{flt, init_db_with_data, setup_test_db, temp_out};

#[test]
fn test_backup_copies_database_file() {
    let db_path = setup_test_db("backup_plain");
    let out = temp_out("backup_plain", "sqlite");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "backup", "--file", &out])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(Path::new(&out).exists());
    assert_eq!(
        fs::metadata(&db_path).unwrap().len(),
        fs::metadata(&out).unwrap().len()
    );
}

#[test]
fn test_backup_compress_produces_zip() {
    let db_path = setup_test_db("backup_zip");
    let out = temp_out("backup_zip", "sqlite");
    init_db_with_data(&db_path);

    flt()
        .args(["--db", &db_path, "backup", "--file", &out, "--compress"])
        .assert()
        .success();

    // The uncompressed copy is replaced by the archive
    assert!(!Path::new(&out).exists());
    let zip_path = Path::new(&out).with_extension("zip");
    assert!(zip_path.exists());

    // Zip magic bytes
    let head = fs::read(&zip_path).unwrap();
    assert_eq!(&head[..2], b"PK");
    fs::remove_file(&zip_path).ok();
}

#[test]
fn test_backup_overwrite_with_force() {
    let db_path = setup_test_db("backup_force");
    let out = temp_out("backup_force", "sqlite");
    init_db_with_data(&db_path);

    fs::write(&out, "stale").unwrap();

    flt()
        .args(["--db", &db_path, "backup", "--file", &out, "--force"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert_ne!(fs::read_to_string(&out).ok().as_deref(), Some("stale"));
}

#[test]
fn test_backup_of_missing_database_fails() {
    let db_path = setup_test_db("backup_missing");
    let out = temp_out("backup_missing", "sqlite");

    flt()
        .args(["--db", &db_path, "backup", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("Database not found"));
}
