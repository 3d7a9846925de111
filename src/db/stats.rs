use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COUNTS
    //
    let outlets: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM outlets", [], |row| row.get(0))?;
    let shifts: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM shifts", [], |row| row.get(0))?;
    let open_shifts: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM shifts WHERE ended_at IS NULL",
        [],
        |row| row.get(0),
    )?;
    let events: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM attendance_events", [], |row| {
            row.get(0)
        })?;
    let accepted: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM attendance_events WHERE accepted = 1",
        [],
        |row| row.get(0),
    )?;

    println!("{}• Outlets:{} {}{}{}", CYAN, RESET, GREEN, outlets, RESET);
    println!(
        "{}• Shifts:{} {}{}{} ({} open)",
        CYAN, RESET, GREEN, shifts, RESET, open_shifts
    );
    println!(
        "{}• Attendance events:{} {}{}{} ({} accepted)",
        CYAN, RESET, GREEN, events, RESET, accepted
    );

    //
    // 3) DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT created_at FROM attendance_events ORDER BY created_at ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT created_at FROM attendance_events ORDER BY created_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Event range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
