use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::CheckLogic;
use crate::core::guard::{
    AttendanceGuard, AuthGuard, CancelToken, RetryPolicy, ShiftResolution, SqliteIdentityProvider,
    SqliteShiftProvider,
};
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::event_kind::EventKind;
use crate::models::geo::GeoPoint;
use crate::ui::messages::{success, warning};
use crate::utils::format_meters;

/// Handle `checkin` / `checkout`: both run the full guard chain
/// (auth → active shift) before the geofence is even evaluated.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (lat, lng, outlet, kind) = match cmd {
        Commands::Checkin { lat, lng, outlet } => (*lat, *lng, outlet.clone(), EventKind::CheckIn),
        Commands::Checkout { lat, lng, outlet } => (*lat, *lng, outlet.clone(), EventKind::CheckOut),
        _ => return Ok(()),
    };

    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    let identity = SqliteIdentityProvider::new(conn);
    let shifts = SqliteShiftProvider::new(conn);
    let retry = RetryPolicy::from_config(cfg);
    let cancel = CancelToken::new();

    let marker = queries::load_current_session(conn)?.map(|s| s.marker);

    let auth = AuthGuard::new(&identity, marker, retry, cancel.clone(), cfg);
    let guard = AttendanceGuard::new(auth, &shifts, outlet, retry, cancel, cfg);

    match guard.resolve_shift()? {
        ShiftResolution::HasActiveShift(shift) => {
            // Malformed coordinates abort here, before anything is recorded
            let observed = GeoPoint::new(lat, lng)?;

            let event = CheckLogic::record(conn, &shift, kind, observed)?;

            if event.accepted {
                success(format!(
                    "{} recorded at {} from the outlet center.",
                    kind.ek_as_str(),
                    format_meters(event.distance_meters)
                ));
            } else {
                warning(format!(
                    "Too far from outlet: {} (allowed radius exceeded). Attempt recorded as rejected.",
                    format_meters(event.distance_meters)
                ));
            }
        }
        ShiftResolution::NoActiveShift { redirect } => {
            warning(format!("No active shift: continue at {}", redirect));
        }
        ShiftResolution::Canceled => {}
    }

    Ok(())
}
