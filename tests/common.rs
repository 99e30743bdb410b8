#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn flt() -> Command {
    cargo_bin_cmd!("flowtracker")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// existing database file plus its sidecar KV directory
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_flowtracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_dir_all(path.with_extension("kv")).ok();
    db_path
}

/// Sidecar KV directory for a test DB path
pub fn kv_dir(db_path: &str) -> PathBuf {
    PathBuf::from(db_path).with_extension("kv")
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize DB and add a small dataset useful for many tests
pub fn init_db_with_data(db_path: &str) {
    flt()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    flt()
        .args([
            "--db",
            db_path,
            "add",
            "uro",
            "--at",
            "2025-06-01T08:00:00.000Z",
            "--volume",
            "300",
            "--duration",
            "30",
        ])
        .assert()
        .success();

    flt()
        .args([
            "--db",
            db_path,
            "add",
            "hydro",
            "--at",
            "2025-06-01T09:00:00.000Z",
            "--type",
            "Water",
            "--amount",
            "330",
        ])
        .assert()
        .success();

    flt()
        .args([
            "--db",
            db_path,
            "add",
            "kegel",
            "--at",
            "2025-06-01T07:00:00.000Z",
            "--reps",
            "10",
            "--hold",
            "5",
            "--sets",
            "3",
        ])
        .assert()
        .success();
}
