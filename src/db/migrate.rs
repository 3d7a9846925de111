use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if a table has a given column.
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `outlets` table (immutable reference data).
fn create_outlets_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS outlets (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL DEFAULT '',
            lat           REAL NOT NULL,
            lng           REAL NOT NULL,
            radius_meters INTEGER NOT NULL CHECK(radius_meters >= 0)
        );
        "#,
    )?;
    Ok(())
}

/// Create the single-row `session` table. The `id = 1` check keeps at most
/// one current session marker per device.
fn create_session_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS session (
            id         INTEGER PRIMARY KEY CHECK(id = 1),
            marker     TEXT NOT NULL,
            user_id    TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create the `shifts` table. A shift is active while `ended_at` IS NULL.
fn create_shifts_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS shifts (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    TEXT NOT NULL,
            outlet_id  TEXT NOT NULL,
            started_at TEXT NOT NULL,
            ended_at   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_shifts_user ON shifts(user_id, ended_at);
        "#,
    )?;
    Ok(())
}

/// Create the `attendance_events` table with the modern schema.
fn create_attendance_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_events (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            shift_id        INTEGER NOT NULL,
            kind            TEXT NOT NULL CHECK(kind IN ('in','out')),
            lat             REAL NOT NULL,
            lng             REAL NOT NULL,
            distance_meters REAL NOT NULL,
            accepted        INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_shift ON attendance_events(shift_id);
        CREATE INDEX IF NOT EXISTS idx_attendance_created ON attendance_events(created_at);
        "#,
    )?;
    Ok(())
}

/// Create the `progress` table: one row per flow, serialized step payload
/// plus the marker of the session the record was created under.
fn create_progress_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS progress (
            flow_name      TEXT PRIMARY KEY,
            steps          TEXT NOT NULL,
            session_marker TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Early releases shipped `outlets` without the display name column.
fn migrate_add_outlet_name(conn: &Connection) -> Result<()> {
    let version = "20250618_0003_add_outlet_name";

    // 1) Check whether already applied
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(());
    }

    if column_exists(conn, "outlets", "name")? {
        return Ok(());
    }

    warning("Adding 'name' column to outlets table...");

    conn.execute(
        "ALTER TABLE outlets ADD COLUMN name TEXT NOT NULL DEFAULT '';",
        [],
    )?;

    // 2) Mark as applied
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added name column to outlets')",
        [version],
    )?;

    success(format!(
        "Migration applied: {} → added 'name' to outlets table",
        version
    ));

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table first: later migrations record themselves there
    ensure_log_table(conn)?;

    // 2) Reference + event tables
    let outlets_existed = table_exists(conn, "outlets")?;

    create_outlets_table(conn)?;
    create_session_table(conn)?;
    create_shifts_table(conn)?;
    create_attendance_events_table(conn)?;
    create_progress_table(conn)?;

    // 3) Column upgrades for databases created by older releases
    if outlets_existed {
        migrate_add_outlet_name(conn)?;
    }

    Ok(())
}
