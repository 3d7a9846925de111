use fieldlog::core::routes;

#[test]
fn test_route_shapes() {
    assert_eq!(routes::project_root("acme", "retail"), "/acme/retail");
    assert_eq!(routes::lobby("acme", "retail"), "/acme/retail/lobby");
    assert_eq!(
        routes::shift_start("acme", "retail"),
        "/acme/retail/attendance/shift-start"
    );
    assert_eq!(
        routes::tracking("acme", "retail"),
        "/acme/retail/attendance/tracking"
    );
}

#[test]
fn test_bare_project_root_normalizes_to_lobby() {
    assert_eq!(
        routes::normalize("/acme/retail", "acme", "retail"),
        "/acme/retail/lobby"
    );
    assert_eq!(
        routes::normalize("/acme/retail/", "acme", "retail"),
        "/acme/retail/lobby"
    );
}

#[test]
fn test_suffixed_paths_pass_through() {
    for path in [
        "/acme/retail/lobby",
        "/acme/retail/attendance/tracking",
        "/other/tenant",
    ] {
        assert_eq!(routes::normalize(path, "acme", "retail"), path);
    }
}
