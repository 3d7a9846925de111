use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::utils::colors::{RESET, color_for_accepted};
use crate::utils::table::{Column, Table};
use crate::utils::formatting::bold;
use crate::utils::{date, describe_kind, format_meters, time};
use chrono::NaiveDate;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        date: day,
        events,
        shifts,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        let day: Option<NaiveDate> = match day {
            Some(raw) => Some(
                date::parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.clone()))?,
            ),
            None => None,
        };

        // With no filter flag, show both sections
        let show_events = *events || !*shifts;
        let show_shifts = *shifts || !*events;

        if show_shifts {
            print_shifts(conn, day.as_ref())?;
        }

        if show_events && show_shifts {
            println!("{}", cfg.separator_char.repeat(25));
        }

        if show_events {
            print_events(conn, day.as_ref())?;
        }
    }

    Ok(())
}

fn print_shifts(conn: &rusqlite::Connection, day: Option<&NaiveDate>) -> AppResult<()> {
    let shifts = queries::list_shifts(conn, day)?;

    if shifts.is_empty() {
        println!("No shifts found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column {
            header: "ID".into(),
            width: 5,
        },
        Column {
            header: "User".into(),
            width: 12,
        },
        Column {
            header: "Outlet".into(),
            width: 10,
        },
        Column {
            header: "Started".into(),
            width: 18,
        },
        Column {
            header: "Ended".into(),
            width: 18,
        },
    ]);

    for s in &shifts {
        table.add_row(vec![
            s.id.to_string(),
            s.user_id.clone(),
            s.outlet_id.clone(),
            time::short_timestamp(&s.started_at),
            s.ended_at
                .as_deref()
                .map(time::short_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{}\n", bold("🕑 Shifts:"));
    print!("{}", table.render());

    Ok(())
}

fn print_events(conn: &rusqlite::Connection, day: Option<&NaiveDate>) -> AppResult<()> {
    let events = queries::list_attendance_events(conn, day)?;

    if events.is_empty() {
        println!("No attendance events found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column {
            header: "ID".into(),
            width: 5,
        },
        Column {
            header: "Shift".into(),
            width: 6,
        },
        Column {
            header: "Kind".into(),
            width: 10,
        },
        Column {
            header: "When".into(),
            width: 18,
        },
        Column {
            header: "Distance".into(),
            width: 10,
        },
        Column {
            header: "Status".into(),
            width: 18,
        },
    ]);

    for ev in &events {
        let (kind_label, _) = describe_kind(ev.kind.to_db_str());
        let status = if ev.accepted { "accepted" } else { "rejected" };

        table.add_row(vec![
            ev.id.to_string(),
            ev.shift_id.to_string(),
            kind_label,
            time::short_timestamp(&ev.created_at),
            format_meters(ev.distance_meters),
            format!("{}{}{}", color_for_accepted(ev.accepted), status, RESET),
        ]);
    }

    println!("{}\n", bold("📍 Attendance events:"));
    print!("{}", table.render());

    Ok(())
}
