use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
///
/// No direct CREATE TABLE here: the full schema (outlets, session, shifts,
/// attendance events, progress, log) is guaranteed by the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}
