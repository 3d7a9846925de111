use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{CENTER_LAT, CENTER_LNG, fl, init_db, init_with_shift, login, setup_test_db};

#[test]
fn test_checkin_requires_login() {
    let db_path = setup_test_db("checkin_no_login");
    init_db(&db_path);

    fl().args([
        "--db", &db_path, "--test", "checkin", "--lat", CENTER_LAT, "--lng", CENTER_LNG,
    ])
    .assert()
    .success()
    .stdout(contains("Not logged in"))
    .stdout(contains("/acme/retail/lobby"));
}

#[test]
fn test_checkin_requires_active_shift() {
    let db_path = setup_test_db("checkin_no_shift");
    init_db(&db_path);
    login(&db_path, "alice", "M1");

    fl().args([
        "--db", &db_path, "--test", "checkin", "--lat", CENTER_LAT, "--lng", CENTER_LNG,
    ])
    .assert()
    .success()
    .stdout(contains("No active shift"))
    .stdout(contains("/acme/retail/attendance/shift-start"));
}

#[test]
fn test_checkin_at_center_is_accepted() {
    let db_path = setup_test_db("checkin_center");
    init_with_shift(&db_path, "M1");

    // Observed position equals the outlet center: distance 0, accepted
    fl().args([
        "--db", &db_path, "--test", "checkin", "--lat", CENTER_LAT, "--lng", CENTER_LNG,
    ])
    .assert()
    .success()
    .stdout(contains("check-in recorded"))
    .stdout(contains("0.0 m"));
}

#[test]
fn test_checkin_outside_radius_is_recorded_rejected() {
    let db_path = setup_test_db("checkin_outside");
    init_with_shift(&db_path, "M1");

    // ~220 m from the center, radius is 200 m
    fl().args([
        "--db", &db_path, "--test", "checkin", "--lat", "10.825", "--lng", "106.695",
    ])
    .assert()
    .success()
    .stdout(contains("Too far from outlet"))
    .stdout(contains("rejected"));

    // The attempt IS recorded, with accepted = 0
    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let (count, accepted): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), SUM(accepted) FROM attendance_events",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("query");
    assert_eq!(count, 1);
    assert_eq!(accepted, 0);
}

#[test]
fn test_checkin_invalid_coordinates_not_recorded() {
    let db_path = setup_test_db("checkin_bad_coords");
    init_with_shift(&db_path, "M1");

    fl().args([
        "--db", &db_path, "--test", "checkin", "--lat", "91.0", "--lng", CENTER_LNG,
    ])
    .assert()
    .failure()
    .stderr(contains("Invalid coordinate"));

    // Malformed input never becomes an event
    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance_events", [], |row| {
            row.get(0)
        })
        .expect("count");
    assert_eq!(count, 0);
}

#[test]
fn test_checkout_records_out_event() {
    let db_path = setup_test_db("checkout_event");
    init_with_shift(&db_path, "M1");

    fl().args([
        "--db", &db_path, "--test", "checkin", "--lat", CENTER_LAT, "--lng", CENTER_LNG,
    ])
    .assert()
    .success();

    fl().args([
        "--db", &db_path, "--test", "checkout", "--lat", CENTER_LAT, "--lng", CENTER_LNG,
    ])
    .assert()
    .success()
    .stdout(contains("check-out recorded"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let kinds: Vec<String> = {
        let mut stmt = conn
            .prepare("SELECT kind FROM attendance_events ORDER BY id ASC")
            .expect("prepare");
        stmt.query_map([], |row| row.get(0))
            .expect("query")
            .map(|r| r.expect("row"))
            .collect()
    };
    assert_eq!(kinds, vec!["in".to_string(), "out".to_string()]);
}

#[test]
fn test_checkin_pinned_to_other_outlet_redirects() {
    let db_path = setup_test_db("checkin_other_outlet");
    init_with_shift(&db_path, "M1");

    // The active shift is at HCM01; pinning the check-in to another outlet
    // must not match it
    fl().args([
        "--db", &db_path, "--test", "checkin", "--outlet", "HN02",
        "--lat", CENTER_LAT, "--lng", CENTER_LNG,
    ])
    .assert()
    .success()
    .stdout(contains("No active shift"));
}

#[test]
fn test_list_shows_events_and_shifts() {
    let db_path = setup_test_db("list_full");
    init_with_shift(&db_path, "M1");

    fl().args([
        "--db", &db_path, "--test", "checkin", "--lat", CENTER_LAT, "--lng", CENTER_LNG,
    ])
    .assert()
    .success();

    fl().args(["--db", &db_path, "--test", "list"])
        .assert()
        .success()
        .stdout(contains("Shifts:"))
        .stdout(contains("HCM01"))
        .stdout(contains("Attendance events:"))
        .stdout(contains("Check-in"))
        .stdout(contains("accepted"));

    // Flag filters limit the output to one section
    fl().args(["--db", &db_path, "--test", "list", "--events"])
        .assert()
        .success()
        .stdout(contains("Attendance events:"))
        .stdout(contains("Shifts:").not());
}
