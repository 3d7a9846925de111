use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{add_outlet, fl, init_db, login, setup_test_db, start_shift};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("init_schema");

    fl().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    // Schema is in place: the tables answer queries
    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let outlets: i64 = conn
        .query_row("SELECT COUNT(*) FROM outlets", [], |row| row.get(0))
        .expect("outlets table");
    let progress: i64 = conn
        .query_row("SELECT COUNT(*) FROM progress", [], |row| row.get(0))
        .expect("progress table");
    assert_eq!(outlets, 0);
    assert_eq!(progress, 0);
}

#[test]
fn test_init_is_idempotent() {
    let db_path = setup_test_db("init_twice");

    init_db(&db_path);
    init_db(&db_path);

    fl().args(["--db", &db_path, "--test", "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_login_and_logout() {
    let db_path = setup_test_db("login_logout");
    init_db(&db_path);

    fl().args(["--db", &db_path, "--test", "login", "alice", "--marker", "M1"])
        .assert()
        .success()
        .stdout(contains("Logged in as alice"))
        .stdout(contains("M1"));

    fl().args(["--db", &db_path, "--test", "logout"])
        .assert()
        .success()
        .stdout(contains("Logged out."));

    // Second logout has nothing to close
    fl().args(["--db", &db_path, "--test", "logout"])
        .assert()
        .success()
        .stdout(contains("No open session"));
}

#[test]
fn test_relogin_replaces_marker() {
    let db_path = setup_test_db("relogin");
    init_db(&db_path);

    login(&db_path, "alice", "OLD");
    login(&db_path, "alice", "NEW");

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))
        .expect("count");
    let marker: String = conn
        .query_row("SELECT marker FROM session WHERE id = 1", [], |row| {
            row.get(0)
        })
        .expect("marker");

    // Single-row table: the new login replaced the old marker
    assert_eq!(count, 1);
    assert_eq!(marker, "NEW");
}

#[test]
fn test_outlet_add_and_list() {
    let db_path = setup_test_db("outlet_add_list");
    init_db(&db_path);
    add_outlet(&db_path);

    fl().args(["--db", &db_path, "--test", "outlet", "list"])
        .assert()
        .success()
        .stdout(contains("HCM01"))
        .stdout(contains("District 1 Store"))
        .stdout(contains("200 m"));
}

#[test]
fn test_outlet_add_rejects_invalid_coordinates() {
    let db_path = setup_test_db("outlet_bad_coords");
    init_db(&db_path);

    fl().args([
        "--db", &db_path, "--test", "outlet", "add", "BAD", "--name", "Nope",
        "--lat", "95.0", "--lng", "10.0", "--radius", "100",
    ])
    .assert()
    .failure()
    .stderr(contains("Invalid coordinate"));
}

#[test]
fn test_shift_requires_login() {
    let db_path = setup_test_db("shift_needs_login");
    init_db(&db_path);
    add_outlet(&db_path);

    // No session: the guard redirects to the lobby route
    fl().args(["--db", &db_path, "--test", "shift", "start", "--outlet", "HCM01"])
        .assert()
        .success()
        .stdout(contains("Not logged in"))
        .stdout(contains("/acme/retail/lobby"));
}

#[test]
fn test_shift_start_end_status() {
    let db_path = setup_test_db("shift_lifecycle");
    init_db(&db_path);
    login(&db_path, "alice", "M1");
    add_outlet(&db_path);

    fl().args(["--db", &db_path, "--test", "shift", "status"])
        .assert()
        .success()
        .stdout(contains("No active shift"));

    start_shift(&db_path);

    fl().args(["--db", &db_path, "--test", "shift", "status"])
        .assert()
        .success()
        .stdout(contains("Active shift"))
        .stdout(contains("HCM01"));

    // A second start is refused while the first is open
    fl().args(["--db", &db_path, "--test", "shift", "start", "--outlet", "HCM01"])
        .assert()
        .success()
        .stdout(contains("still open"));

    fl().args(["--db", &db_path, "--test", "shift", "end"])
        .assert()
        .success()
        .stdout(contains("ended"));

    fl().args(["--db", &db_path, "--test", "shift", "status"])
        .assert()
        .success()
        .stdout(contains("No active shift"));
}

#[test]
fn test_shift_start_unknown_outlet() {
    let db_path = setup_test_db("shift_unknown_outlet");
    init_db(&db_path);
    login(&db_path, "alice", "M1");

    fl().args(["--db", &db_path, "--test", "shift", "start", "--outlet", "NOPE"])
        .assert()
        .failure()
        .stderr(contains("Unknown outlet"));
}

#[test]
fn test_expired_session_redirects() {
    let db_path = setup_test_db("expired_session");
    init_db(&db_path);

    // ttl 0: the session is already expired when the guard runs
    fl().args([
        "--db", &db_path, "--test", "login", "alice", "--marker", "M1", "--ttl", "0",
    ])
    .assert()
    .success();

    fl().args(["--db", &db_path, "--test", "shift", "status"])
        .assert()
        .success()
        .stdout(contains("Not logged in"))
        .stdout(contains("/acme/retail/lobby"));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("log_records");
    init_db(&db_path);
    login(&db_path, "alice", "M1");
    add_outlet(&db_path);
    start_shift(&db_path);

    fl().args(["--db", &db_path, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("login"))
        .stdout(contains("outlet_add"))
        .stdout(contains("shift_start"));
}

#[test]
fn test_list_empty_db() {
    let db_path = setup_test_db("list_empty");
    init_db(&db_path);

    fl().args(["--db", &db_path, "--test", "list"])
        .assert()
        .success()
        .stdout(contains("No shifts found"))
        .stdout(contains("No attendance events found"));
}

#[test]
fn test_list_invalid_date() {
    let db_path = setup_test_db("list_bad_date");
    init_db(&db_path);

    fl().args(["--db", &db_path, "--test", "list", "--date", "2025-9"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn test_config_check_reports_complete_defaults() {
    let db_path = setup_test_db("config_check");
    init_db(&db_path);

    // In test mode no config file is written, so check just warns
    fl().args(["--db", &db_path, "--test", "config", "--check"])
        .assert()
        .success()
        .stdout(contains("No config file").or(contains("complete")));
}
