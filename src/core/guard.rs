//! Route guards: authentication and active-shift checks that gate the
//! attendance and survey commands.
//!
//! Each guard exposes a single `resolve()` returning a tagged outcome;
//! composition is sequencing (attendance = auth, then shift). Guard
//! failures resolve to a redirect route, never a process error.

use crate::config::Config;
use crate::core::routes;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::shift::Shift;
use crate::utils::time;
use rusqlite::Connection;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Answer of the identity collaborator for one marker.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCheck {
    Valid { user_id: String, expires_at: String },
    Invalid,
}

/// Narrow interface to the identity collaborator. `Err(IdentityUnavailable)`
/// means the provider could not be reached and the call may be retried;
/// `Ok(Invalid)` is a definitive answer and is never retried.
pub trait IdentityProvider {
    fn validate_session(&self, marker: &str) -> AppResult<SessionCheck>;
}

/// Narrow interface to the shift collaborator.
pub trait ShiftProvider {
    fn active_shift(&self, user_id: &str, outlet_id: Option<&str>) -> AppResult<Option<Shift>>;
}

/// Cooperative cancellation for an in-flight guard resolution. A canceled
/// resolution must not apply a redirect or any store write.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounded retry for collaborator unavailability.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            attempts: cfg.identity_retry_count.max(1),
            interval_ms: cfg.identity_retry_interval_ms,
        }
    }

    /// Run `op`, retrying while `retryable` says so, sleeping between
    /// attempts. Returns `Ok(None)` when the token is canceled mid-flight.
    fn run<T>(
        &self,
        cancel: &CancelToken,
        retryable: impl Fn(&AppError) -> bool,
        op: impl Fn() -> AppResult<T>,
    ) -> AppResult<Option<T>> {
        let mut last_err: Option<AppError> = None;
        for attempt in 0..self.attempts {
            if cancel.is_canceled() {
                return Ok(None);
            }
            if attempt > 0 {
                thread::sleep(Duration::from_millis(self.interval_ms));
                if cancel.is_canceled() {
                    return Ok(None);
                }
            }
            match op() {
                Ok(v) => {
                    if cancel.is_canceled() {
                        return Ok(None);
                    }
                    return Ok(Some(v));
                }
                Err(e) if retryable(&e) => last_err = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| AppError::Other("retry loop without attempts".into())))
    }
}

/// Tagged guard states, mirrored by both guards.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthResolution {
    Authenticated { user_id: String },
    Unauthenticated { redirect: String },
    Canceled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShiftResolution {
    HasActiveShift(Shift),
    NoActiveShift { redirect: String },
    Canceled,
}

/// Flattened outcome shared by every guard.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
    Canceled,
}

pub trait Guard {
    fn resolve(&self) -> AppResult<GuardOutcome>;
}

/// Blocks the protected command until an authenticated, non-expired session
/// is confirmed; otherwise yields a redirect to the lobby route.
pub struct AuthGuard<'a> {
    identity: &'a dyn IdentityProvider,
    marker: Option<String>,
    retry: RetryPolicy,
    cancel: CancelToken,
    login_route: String,
}

impl<'a> AuthGuard<'a> {
    pub fn new(
        identity: &'a dyn IdentityProvider,
        marker: Option<String>,
        retry: RetryPolicy,
        cancel: CancelToken,
        cfg: &Config,
    ) -> Self {
        Self {
            identity,
            marker,
            retry,
            cancel,
            login_route: routes::lobby(&cfg.tenant_code, &cfg.project_code),
        }
    }

    pub fn resolve_auth(&self) -> AppResult<AuthResolution> {
        if self.cancel.is_canceled() {
            return Ok(AuthResolution::Canceled);
        }

        let Some(marker) = self.marker.as_deref() else {
            return Ok(AuthResolution::Unauthenticated {
                redirect: self.login_route.clone(),
            });
        };

        let checked = self.retry.run(
            &self.cancel,
            |e| matches!(e, AppError::IdentityUnavailable(_)),
            || self.identity.validate_session(marker),
        );

        match checked {
            Ok(None) => Ok(AuthResolution::Canceled),
            Ok(Some(SessionCheck::Valid { user_id, .. })) => {
                Ok(AuthResolution::Authenticated { user_id })
            }
            // explicit invalid session: redirect immediately, no retry
            Ok(Some(SessionCheck::Invalid)) => Ok(AuthResolution::Unauthenticated {
                redirect: self.login_route.clone(),
            }),
            // retries exhausted: treat as unauthenticated
            Err(AppError::IdentityUnavailable(_)) => Ok(AuthResolution::Unauthenticated {
                redirect: self.login_route.clone(),
            }),
            Err(e) => Err(e),
        }
    }
}

impl Guard for AuthGuard<'_> {
    fn resolve(&self) -> AppResult<GuardOutcome> {
        Ok(match self.resolve_auth()? {
            AuthResolution::Authenticated { .. } => GuardOutcome::Allow,
            AuthResolution::Unauthenticated { redirect } => GuardOutcome::Redirect(redirect),
            AuthResolution::Canceled => GuardOutcome::Canceled,
        })
    }
}

/// Composes the auth guard with the active-shift check. The tracking
/// commands run only behind `HasActiveShift`; a missing shift redirects to
/// the shift-start page and never creates a shift silently.
pub struct AttendanceGuard<'a> {
    auth: AuthGuard<'a>,
    shifts: &'a dyn ShiftProvider,
    outlet_id: Option<String>,
    retry: RetryPolicy,
    cancel: CancelToken,
    shift_start_route: String,
}

impl<'a> AttendanceGuard<'a> {
    pub fn new(
        auth: AuthGuard<'a>,
        shifts: &'a dyn ShiftProvider,
        outlet_id: Option<String>,
        retry: RetryPolicy,
        cancel: CancelToken,
        cfg: &Config,
    ) -> Self {
        Self {
            auth,
            shifts,
            outlet_id,
            retry,
            cancel,
            shift_start_route: routes::shift_start(&cfg.tenant_code, &cfg.project_code),
        }
    }

    pub fn resolve_shift(&self) -> AppResult<ShiftResolution> {
        let user_id = match self.auth.resolve_auth()? {
            AuthResolution::Authenticated { user_id } => user_id,
            AuthResolution::Unauthenticated { redirect } => {
                return Ok(ShiftResolution::NoActiveShift { redirect });
            }
            AuthResolution::Canceled => return Ok(ShiftResolution::Canceled),
        };

        let found = self.retry.run(
            &self.cancel,
            |e| matches!(e, AppError::ShiftUnavailable(_)),
            || self.shifts.active_shift(&user_id, self.outlet_id.as_deref()),
        );

        match found {
            Ok(None) => Ok(ShiftResolution::Canceled),
            Ok(Some(Some(shift))) => Ok(ShiftResolution::HasActiveShift(shift)),
            Ok(Some(None)) => Ok(ShiftResolution::NoActiveShift {
                redirect: self.shift_start_route.clone(),
            }),
            Err(AppError::ShiftUnavailable(_)) => Ok(ShiftResolution::NoActiveShift {
                redirect: self.shift_start_route.clone(),
            }),
            Err(e) => Err(e),
        }
    }
}

impl Guard for AttendanceGuard<'_> {
    fn resolve(&self) -> AppResult<GuardOutcome> {
        Ok(match self.resolve_shift()? {
            ShiftResolution::HasActiveShift(_) => GuardOutcome::Allow,
            ShiftResolution::NoActiveShift { redirect } => GuardOutcome::Redirect(redirect),
            ShiftResolution::Canceled => GuardOutcome::Canceled,
        })
    }
}

/// Default identity collaborator: checks the device session row in SQLite.
pub struct SqliteIdentityProvider<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteIdentityProvider<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl IdentityProvider for SqliteIdentityProvider<'_> {
    fn validate_session(&self, marker: &str) -> AppResult<SessionCheck> {
        let Some(session) = queries::load_current_session(self.conn)? else {
            return Ok(SessionCheck::Invalid);
        };
        if session.marker != marker || session.is_expired(time::now()) {
            return Ok(SessionCheck::Invalid);
        }
        Ok(SessionCheck::Valid {
            user_id: session.user_id,
            expires_at: session.expires_at,
        })
    }
}

/// Default shift collaborator: queries the shifts table.
pub struct SqliteShiftProvider<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteShiftProvider<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ShiftProvider for SqliteShiftProvider<'_> {
    fn active_shift(&self, user_id: &str, outlet_id: Option<&str>) -> AppResult<Option<Shift>> {
        queries::find_active_shift(self.conn, user_id, outlet_id)
    }
}
