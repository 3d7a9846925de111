use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::session::Session;
use crate::ui::messages::success;
use crate::utils::time;

/// Open the device session. A repeated login replaces the stored marker;
/// the survey flows notice the change on their next mount and reset.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login {
        user_id,
        marker,
        ttl,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        let marker = marker.clone().unwrap_or_else(session::new_marker);
        let ttl = ttl.unwrap_or(cfg.session_ttl_minutes);

        let session = Session {
            marker,
            user_id: user_id.clone(),
            expires_at: time::expiry_rfc3339(ttl),
            created_at: time::now_rfc3339(),
        };

        queries::save_session(conn, &session)?;

        ttlog(
            conn,
            "login",
            user_id,
            &format!("Session opened (expires {})", session.expires_at),
        )?;

        success(format!(
            "Logged in as {} (marker {})",
            user_id, session.marker
        ));
    }

    Ok(())
}
