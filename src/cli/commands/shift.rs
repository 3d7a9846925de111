use crate::cli::parser::{Commands, ShiftAction};
use crate::config::Config;
use crate::core::guard::{
    AuthGuard, AuthResolution, CancelToken, RetryPolicy, SqliteIdentityProvider,
};
use crate::core::routes;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::time;
use rusqlite::Connection;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Shift { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        // Every shift operation sits behind the auth guard; a failed check
        // resolves to a redirect message, never a process error.
        let user_id = match resolve_user(conn, cfg)? {
            Some(user_id) => user_id,
            None => return Ok(()),
        };

        match action {
            ShiftAction::Start { outlet } => {
                if let Some(open) = queries::find_active_shift(conn, &user_id, None)? {
                    warning(format!(
                        "Shift {} at outlet {} is still open: end it first.",
                        open.id, open.outlet_id
                    ));
                    return Ok(());
                }

                // Never start a shift against an unknown outlet
                let Some(outlet_row) = queries::load_outlet(conn, outlet)? else {
                    return Err(AppError::UnknownOutlet(outlet.clone()));
                };

                let started_at = time::now_rfc3339();
                let shift_id = queries::insert_shift(conn, &user_id, outlet, &started_at)?;

                ttlog(
                    conn,
                    "shift_start",
                    outlet,
                    &format!("Shift {} started by {}", shift_id, user_id),
                )?;

                success(format!(
                    "Shift {} started at {} ({}).",
                    shift_id, outlet_row.id, outlet_row.name
                ));
                info(format!(
                    "Tracking available at {}",
                    routes::tracking(&cfg.tenant_code, &cfg.project_code)
                ));
            }

            ShiftAction::End => {
                let Some(shift) = queries::find_active_shift(conn, &user_id, None)? else {
                    info("No active shift to end.");
                    return Ok(());
                };

                let ended_at = time::now_rfc3339();
                queries::end_shift(conn, shift.id, &ended_at)?;

                ttlog(
                    conn,
                    "shift_end",
                    &shift.outlet_id,
                    &format!("Shift {} ended by {}", shift.id, user_id),
                )?;

                success(format!("Shift {} ended.", shift.id));
            }

            ShiftAction::Status => match queries::find_active_shift(conn, &user_id, None)? {
                Some(shift) => {
                    println!("🕑 Active shift:");
                    println!("   id:      {}", shift.id);
                    println!("   outlet:  {}", shift.outlet_id);
                    println!("   started: {}", time::short_timestamp(&shift.started_at));
                }
                None => info("No active shift."),
            },
        }
    }

    Ok(())
}

/// Run the auth guard and return the authenticated user, or `None` after
/// printing the redirect (the CLI analog of navigating to the lobby).
fn resolve_user(conn: &Connection, cfg: &Config) -> AppResult<Option<String>> {
    let identity = SqliteIdentityProvider::new(conn);
    let retry = RetryPolicy::from_config(cfg);
    let cancel = CancelToken::new();

    let marker = queries::load_current_session(conn)?.map(|s| s.marker);

    let guard = AuthGuard::new(&identity, marker, retry, cancel, cfg);

    match guard.resolve_auth()? {
        AuthResolution::Authenticated { user_id } => Ok(Some(user_id)),
        AuthResolution::Unauthenticated { redirect } => {
            warning(format!("Not logged in: continue at {}", redirect));
            Ok(None)
        }
        AuthResolution::Canceled => Ok(None),
    }
}
