//! Survey/gift flow progress: the step state machine and the persisted
//! progress store it writes through.
//!
//! Every transition is persisted before the outcome is returned, so a
//! process restart never drops a completed transition.

use crate::core::reset::{ResetOutcome, SessionResetPolicy};
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::progress_record::ProgressRecord;
use rusqlite::Connection;

/// Keyed, persisted mapping from a flow name to its progress record.
///
/// `set` overwrites atomically (last-write-wins); `clear` of a missing
/// record is a no-op.
pub trait ProgressStore {
    fn get(&self, flow: &str) -> AppResult<Option<ProgressRecord>>;
    fn set(&self, flow: &str, record: &ProgressRecord) -> AppResult<()>;
    fn clear(&self, flow: &str) -> AppResult<()>;
}

/// SQLite-backed store; the default for the CLI.
pub struct SqliteProgressStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteProgressStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ProgressStore for SqliteProgressStore<'_> {
    fn get(&self, flow: &str) -> AppResult<Option<ProgressRecord>> {
        queries::load_progress(self.conn, flow)
    }

    fn set(&self, flow: &str, record: &ProgressRecord) -> AppResult<()> {
        queries::save_progress(self.conn, flow, record)
    }

    fn clear(&self, flow: &str) -> AppResult<()> {
        queries::clear_progress(self.conn, flow)
    }
}

/// A fixed, ordered step sequence for one named flow.
pub struct FlowDefinition {
    pub name: &'static str,
    pub steps: &'static [&'static str],
}

pub const GIFT_FLOW: FlowDefinition = FlowDefinition {
    name: "gift-progress",
    steps: &["phone-verification", "code-entry", "gift-reveal"],
};

pub const SURVEY_FLOW: FlowDefinition = FlowDefinition {
    name: "survey-progress",
    steps: &["intro", "questions", "thanks"],
};

/// All flows whose progress is session-scoped. `logout` clears each of
/// these as the backup reset path.
pub const KNOWN_FLOWS: &[&FlowDefinition] = &[&GIFT_FLOW, &SURVEY_FLOW];

pub fn flow_by_name(name: &str) -> Option<&'static FlowDefinition> {
    KNOWN_FLOWS.iter().copied().find(|f| f.name == name)
}

/// Result flag of a step transition. Misuse (`TerminalStep`,
/// `InvalidTransition`) leaves the flow state unchanged and is not an error
/// that aborts the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Moved { step: String },
    TerminalStep,
    InvalidTransition { requested: String },
}

/// Drives one flow's step sequencing, reading and writing the progress
/// store. Constructed via [`SurveyProgress::open`], which reconciles the
/// stored record against the live session marker first.
pub struct SurveyProgress<'a, S: ProgressStore + ?Sized> {
    flow: &'static FlowDefinition,
    store: &'a S,
    record: ProgressRecord,
}

impl<'a, S: ProgressStore + ?Sized> SurveyProgress<'a, S> {
    /// Mount the flow: run the session reset policy, then either adopt the
    /// surviving record or start at the first step (persisted immediately).
    pub fn open(store: &'a S, flow: &'static FlowDefinition, marker: &str) -> AppResult<Self> {
        let policy = SessionResetPolicy::new(store);
        let record = match policy.reconcile(flow.name, marker)? {
            ResetOutcome::Bound(record) => {
                // reconcile guarantees the marker matches; anything else
                // would hand stale progress to the consumer
                if record.session_marker != marker {
                    return Err(AppError::StaleProgress(flow.name.to_string()));
                }
                record
            }
            ResetOutcome::Fresh | ResetOutcome::Cleared => {
                let first = flow.steps.first().ok_or_else(|| {
                    AppError::Other(format!("flow '{}' has no steps", flow.name))
                })?;
                let record = ProgressRecord {
                    flow_name: flow.name.to_string(),
                    current_step: (*first).to_string(),
                    step_history: vec![(*first).to_string()],
                    session_marker: marker.to_string(),
                };
                store.set(flow.name, &record)?;
                record
            }
        };

        Ok(Self { flow, store, record })
    }

    pub fn current_step(&self) -> &str {
        &self.record.current_step
    }

    pub fn step_history(&self) -> &[String] {
        &self.record.step_history
    }

    pub fn is_terminal(&self) -> bool {
        self.current_index() == self.flow.steps.len() - 1
    }

    fn current_index(&self) -> usize {
        self.flow
            .steps
            .iter()
            .position(|s| *s == self.record.current_step)
            .unwrap_or(0)
    }

    /// Move to the next step in the sequence. At the last step this is an
    /// idempotent no-op reporting `TerminalStep`.
    pub fn advance(&mut self) -> AppResult<StepOutcome> {
        let idx = self.current_index();
        if idx + 1 >= self.flow.steps.len() {
            return Ok(StepOutcome::TerminalStep);
        }
        let next = self.flow.steps[idx + 1].to_string();
        self.transition_to(next)
    }

    /// Jump to a named step. Allowed only to a step at or before the
    /// current position plus one; arbitrary forward jumps would skip
    /// required steps.
    pub fn go_to(&mut self, step: &str) -> AppResult<StepOutcome> {
        let target = self
            .flow
            .steps
            .iter()
            .position(|s| *s == step)
            .ok_or_else(|| AppError::UnknownStep {
                flow: self.flow.name.to_string(),
                step: step.to_string(),
            })?;

        if target > self.current_index() + 1 {
            return Ok(StepOutcome::InvalidTransition {
                requested: step.to_string(),
            });
        }
        self.transition_to(self.flow.steps[target].to_string())
    }

    /// Append to history and persist BEFORE acknowledging the move.
    fn transition_to(&mut self, step: String) -> AppResult<StepOutcome> {
        let mut next = self.record.clone();
        next.current_step = step.clone();
        next.step_history.push(step.clone());
        self.store.set(self.flow.name, &next)?;
        self.record = next;
        Ok(StepOutcome::Moved { step })
    }
}
