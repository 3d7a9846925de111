use crate::config::Config;
use crate::core::progress::{KNOWN_FLOWS, SqliteProgressStore};
use crate::core::reset::SessionResetPolicy;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Close the device session.
///
/// Sign-out is the backup reset trigger: independent of the marker
/// comparison that runs on flow mounts, it clears every session-scoped
/// flow. Both triggers are idempotent, so whichever runs first wins and
/// the other becomes a no-op.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    let removed = queries::delete_session(conn)?;

    if removed == 0 {
        info("No open session on this device.");
    } else {
        ttlog(conn, "logout", "", "Session closed")?;
    }

    if cfg.clear_progress_on_logout {
        let store = SqliteProgressStore::new(conn);
        let policy = SessionResetPolicy::new(&store);

        for flow in KNOWN_FLOWS {
            policy.clear_on_signout(flow.name)?;
        }

        ttlog(conn, "progress_cleared", "", "Cleared survey progress on sign-out")?;
    }

    if removed > 0 {
        success("Logged out.");
    }

    Ok(())
}
