//! Session reset policy: decides on every flow mount whether stored
//! progress is honored (same login session) or discarded (new session).
//!
//! Two independent triggers can clear a flow's progress: the marker
//! comparison here, and the sign-out clear in the `logout` command. Either
//! may run first; both are idempotent, so a genuine new session resets
//! progress exactly once.

use crate::core::progress::ProgressStore;
use crate::core::session;
use crate::errors::AppResult;
use crate::models::progress_record::ProgressRecord;

/// Outcome of reconciling one flow against the live session marker.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    /// No record stored yet.
    Fresh,
    /// Record exists and belongs to the current session.
    Bound(ProgressRecord),
    /// Record existed under an older session and was cleared.
    Cleared,
}

pub struct SessionResetPolicy<'a, S: ProgressStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ProgressStore + ?Sized> SessionResetPolicy<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Compare the record's marker with the current one and clear the flow
    /// if the session changed. Clearing an already-empty flow is a no-op,
    /// so repeated reconciles with the same marker never clear twice.
    pub fn reconcile(&self, flow: &str, current_marker: &str) -> AppResult<ResetOutcome> {
        match self.store.get(flow)? {
            None => Ok(ResetOutcome::Fresh),
            Some(record) => {
                if session::has_session_changed(
                    Some(&record.session_marker),
                    Some(current_marker),
                ) {
                    self.store.clear(flow)?;
                    Ok(ResetOutcome::Cleared)
                } else {
                    Ok(ResetOutcome::Bound(record))
                }
            }
        }
    }

    /// Backup trigger: unconditionally clear a flow on sign-out. Safe to
    /// run before or after `reconcile`, in any order.
    pub fn clear_on_signout(&self, flow: &str) -> AppResult<()> {
        self.store.clear(flow)
    }
}
