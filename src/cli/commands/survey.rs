use crate::cli::parser::{Commands, SurveyAction};
use crate::config::Config;
use crate::core::guard::{
    AuthGuard, AuthResolution, CancelToken, RetryPolicy, SqliteIdentityProvider,
};
use crate::core::otp;
use crate::core::progress::{GIFT_FLOW, SqliteProgressStore, StepOutcome, SurveyProgress, flow_by_name};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Survey { flow, action } = cmd {
        let flow_def =
            flow_by_name(flow).ok_or_else(|| AppError::UnknownFlow(flow.clone()))?;

        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        //
        // 1) AUTH GUARD
        //
        let identity = SqliteIdentityProvider::new(conn);
        let retry = RetryPolicy::from_config(cfg);
        let cancel = CancelToken::new();

        let marker = queries::load_current_session(conn)?.map(|s| s.marker);

        let guard = AuthGuard::new(&identity, marker.clone(), retry, cancel, cfg);

        match guard.resolve_auth()? {
            AuthResolution::Authenticated { .. } => {}
            AuthResolution::Unauthenticated { redirect } => {
                warning(format!("Not logged in: continue at {}", redirect));
                return Ok(());
            }
            AuthResolution::Canceled => return Ok(()),
        }

        // Auth passed, so the marker is present and valid
        let marker = marker.unwrap_or_default();

        //
        // 2) MOUNT THE FLOW (reset policy runs inside `open`)
        //
        let store = SqliteProgressStore::new(conn);
        let mut progress = SurveyProgress::open(&store, flow_def, &marker)?;

        match action {
            SurveyAction::Advance => match progress.advance()? {
                StepOutcome::Moved { step } => {
                    success(format!("Moved to step '{}'.", step));
                    ttlog(conn, "survey_step", flow_def.name, &format!("Advanced to {}", step))?;
                    print_step_extras(cfg, flow_def.name, &step);
                }
                StepOutcome::TerminalStep => {
                    info("Already at the last step, nothing to advance.");
                }
                // advance never reports a jump
                StepOutcome::InvalidTransition { .. } => {}
            },

            SurveyAction::Goto { step } => match progress.go_to(step)? {
                StepOutcome::Moved { step } => {
                    success(format!("Moved to step '{}'.", step));
                    ttlog(conn, "survey_step", flow_def.name, &format!("Went to {}", step))?;
                    print_step_extras(cfg, flow_def.name, &step);
                }
                StepOutcome::InvalidTransition { requested } => {
                    warning(format!(
                        "Cannot jump ahead to '{}': earlier steps are still pending.",
                        requested
                    ));
                }
                // go_to reports InvalidTransition instead
                StepOutcome::TerminalStep => {}
            },

            SurveyAction::Show => {
                println!("📋 Flow '{}':", flow_def.name);
                println!("   current step: {}", progress.current_step());
                println!("   history:      {}", progress.step_history().join(" → "));
                if progress.is_terminal() {
                    println!("   (terminal step reached)");
                }
            }
        }
    }

    Ok(())
}

/// Step side effects that belong to the CLI surface, not the state
/// machine: the gift flow shows a one-time code when code-entry opens.
fn print_step_extras(cfg: &Config, flow_name: &str, step: &str) {
    if flow_name == GIFT_FLOW.name && step == "code-entry" {
        info(format!(
            "Verification code: {}",
            otp::generate(cfg.otp_length)
        ));
    }
}
