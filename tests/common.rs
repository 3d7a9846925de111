#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Outlet center used across the attendance tests.
pub const CENTER_LAT: &str = "10.823553418004595";
pub const CENTER_LNG: &str = "106.6935899631407";

pub fn fl() -> Command {
    cargo_bin_cmd!("fieldlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_fieldlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the schema at the given DB path (test mode: no config write)
pub fn init_db(db_path: &str) {
    fl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Open a session with a fixed marker so tests can force session changes
pub fn login(db_path: &str, user: &str, marker: &str) {
    fl().args(["--db", db_path, "--test", "login", user, "--marker", marker])
        .assert()
        .success();
}

/// Register the standard test outlet (id HCM01, radius 200 m)
pub fn add_outlet(db_path: &str) {
    fl().args([
        "--db", db_path, "--test", "outlet", "add", "HCM01", "--name", "District 1 Store",
        "--lat", CENTER_LAT, "--lng", CENTER_LNG, "--radius", "200",
    ])
    .assert()
    .success();
}

/// Start a shift at the standard test outlet
pub fn start_shift(db_path: &str) {
    fl().args(["--db", db_path, "--test", "shift", "start", "--outlet", "HCM01"])
        .assert()
        .success();
}

/// Full fixture: schema + session + outlet + active shift
pub fn init_with_shift(db_path: &str, marker: &str) {
    init_db(db_path);
    login(db_path, "alice", marker);
    add_outlet(db_path);
    start_shift(db_path);
}
