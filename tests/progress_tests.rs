use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use fieldlog::core::progress::{
    GIFT_FLOW, ProgressStore, StepOutcome, SurveyProgress, flow_by_name,
};
use fieldlog::core::reset::{ResetOutcome, SessionResetPolicy};
use fieldlog::errors::{AppError, AppResult};
use fieldlog::models::progress_record::{ProgressRecord, StoredSteps};

/// In-memory store standing in for the SQLite one; counts writes and
/// clears so the tests can assert on persistence ordering.
#[derive(Default)]
struct MemStore {
    map: RefCell<HashMap<String, ProgressRecord>>,
    writes: Cell<usize>,
    clears: Cell<usize>,
}

impl ProgressStore for MemStore {
    fn get(&self, flow: &str) -> AppResult<Option<ProgressRecord>> {
        Ok(self.map.borrow().get(flow).cloned())
    }

    fn set(&self, flow: &str, record: &ProgressRecord) -> AppResult<()> {
        self.writes.set(self.writes.get() + 1);
        self.map.borrow_mut().insert(flow.to_string(), record.clone());
        Ok(())
    }

    fn clear(&self, flow: &str) -> AppResult<()> {
        if self.map.borrow_mut().remove(flow).is_some() {
            self.clears.set(self.clears.get() + 1);
        }
        Ok(())
    }
}

#[test]
fn test_open_fresh_persists_first_step() {
    let store = MemStore::default();

    let progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");

    assert_eq!(progress.current_step(), "phone-verification");
    assert_eq!(progress.step_history(), ["phone-verification"]);
    // The initial record hits the store before open() returns
    assert_eq!(store.writes.get(), 1);
}

#[test]
fn test_advance_appends_history_and_persists_before_returning() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");

    let outcome = progress.advance().expect("advance");
    assert_eq!(
        outcome,
        StepOutcome::Moved {
            step: "code-entry".to_string()
        }
    );

    // A second mount (the reload analog) sees the persisted transition
    let reopened = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("reopen");
    assert_eq!(reopened.current_step(), "code-entry");
    assert_eq!(reopened.step_history(), ["phone-verification", "code-entry"]);
}

#[test]
fn test_history_never_shrinks() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");

    let mut last_len = progress.step_history().len();

    for _ in 0..6 {
        progress.advance().expect("advance");
        let len = progress.step_history().len();
        assert!(len >= last_len);
        last_len = len;
    }
}

#[test]
fn test_advance_at_terminal_is_idempotent() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");

    progress.advance().expect("advance");
    progress.advance().expect("advance");
    assert!(progress.is_terminal());

    let history_before = progress.step_history().to_vec();
    let writes_before = store.writes.get();

    for _ in 0..3 {
        let outcome = progress.advance().expect("advance");
        assert_eq!(outcome, StepOutcome::TerminalStep);
    }

    // State, history and store are all untouched
    assert_eq!(progress.current_step(), "gift-reveal");
    assert_eq!(progress.step_history(), history_before.as_slice());
    assert_eq!(store.writes.get(), writes_before);
}

#[test]
fn test_goto_rejects_forward_jump_without_state_change() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");

    let writes_before = store.writes.get();

    let outcome = progress.go_to("gift-reveal").expect("go_to");
    assert_eq!(
        outcome,
        StepOutcome::InvalidTransition {
            requested: "gift-reveal".to_string()
        }
    );
    assert_eq!(progress.current_step(), "phone-verification");
    assert_eq!(store.writes.get(), writes_before);
}

#[test]
fn test_goto_allows_next_and_backward() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");

    assert_eq!(
        progress.go_to("code-entry").expect("go_to"),
        StepOutcome::Moved {
            step: "code-entry".to_string()
        }
    );

    // Backward moves append to the transition log instead of rewriting it
    assert_eq!(
        progress.go_to("phone-verification").expect("go_to"),
        StepOutcome::Moved {
            step: "phone-verification".to_string()
        }
    );
    assert_eq!(
        progress.step_history(),
        ["phone-verification", "code-entry", "phone-verification"]
    );
}

#[test]
fn test_goto_unknown_step_is_an_error() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");

    let err = progress.go_to("jackpot").unwrap_err();
    assert!(matches!(err, AppError::UnknownStep { .. }));
    assert_eq!(progress.current_step(), "phone-verification");
}

#[test]
fn test_reset_policy_keeps_bound_record_idempotently() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "M1").expect("open");
    progress.advance().expect("advance");

    let policy = SessionResetPolicy::new(&store);

    // Unchanged marker: Bound every time, never cleared
    for _ in 0..3 {
        match policy.reconcile(GIFT_FLOW.name, "M1").expect("reconcile") {
            ResetOutcome::Bound(record) => assert_eq!(record.current_step, "code-entry"),
            other => panic!("expected Bound, got {:?}", other),
        }
    }
    assert_eq!(store.clears.get(), 0);
}

#[test]
fn test_reset_policy_clears_exactly_once_on_session_change() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "OLD").expect("open");
    progress.advance().expect("advance");

    let policy = SessionResetPolicy::new(&store);

    // Changed marker: cleared once
    assert_eq!(
        policy.reconcile(GIFT_FLOW.name, "NEW").expect("reconcile"),
        ResetOutcome::Cleared
    );
    assert_eq!(store.clears.get(), 1);

    // Repeating with the same (now-equal) marker is a no-op
    assert_eq!(
        policy.reconcile(GIFT_FLOW.name, "NEW").expect("reconcile"),
        ResetOutcome::Fresh
    );
    assert_eq!(store.clears.get(), 1);
}

#[test]
fn test_both_reset_triggers_compose_without_ordering() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "OLD").expect("open");
    progress.advance().expect("advance");

    let policy = SessionResetPolicy::new(&store);

    // Sign-out trigger first, marker trigger second
    policy.clear_on_signout(GIFT_FLOW.name).expect("signout clear");
    assert_eq!(
        policy.reconcile(GIFT_FLOW.name, "NEW").expect("reconcile"),
        ResetOutcome::Fresh
    );

    // One genuine reset, regardless of which signal fired first
    assert_eq!(store.clears.get(), 1);

    // And the sign-out trigger on an already-empty flow stays a no-op
    policy.clear_on_signout(GIFT_FLOW.name).expect("signout clear");
    assert_eq!(store.clears.get(), 1);
}

#[test]
fn test_open_after_session_change_restarts_flow() {
    let store = MemStore::default();
    let mut progress = SurveyProgress::open(&store, &GIFT_FLOW, "OLD").expect("open");
    progress.advance().expect("advance");
    progress.advance().expect("advance");

    // New session: the mount clears and restarts at the first step
    let reopened = SurveyProgress::open(&store, &GIFT_FLOW, "NEW").expect("reopen");
    assert_eq!(reopened.current_step(), "phone-verification");
    assert_eq!(reopened.step_history(), ["phone-verification"]);

    // The stored record is bound to the new marker
    let stored = store.get(GIFT_FLOW.name).expect("get").expect("record");
    assert_eq!(stored.session_marker, "NEW");
}

#[test]
fn test_stored_steps_round_trip_exactly() {
    let record = ProgressRecord {
        flow_name: "gift-progress".to_string(),
        current_step: "code-entry".to_string(),
        step_history: vec![
            "phone-verification".to_string(),
            "code-entry".to_string(),
            "phone-verification".to_string(),
            "code-entry".to_string(),
        ],
        session_marker: "M1".to_string(),
    };

    let raw = record.serialize_steps().expect("serialize");
    let back =
        ProgressRecord::deserialize_steps("gift-progress", "M1", &raw).expect("deserialize");

    assert_eq!(back, record);

    // And the payload alone round-trips through serde_json untouched
    let stored: StoredSteps = serde_json::from_str(&raw).expect("payload");
    assert_eq!(stored, record.to_stored());
}

#[test]
fn test_flow_registry_lookup() {
    assert_eq!(flow_by_name("gift-progress").map(|f| f.name), Some("gift-progress"));
    assert_eq!(
        flow_by_name("survey-progress").map(|f| f.steps.len()),
        Some(3)
    );
    assert!(flow_by_name("unknown").is_none());
}
