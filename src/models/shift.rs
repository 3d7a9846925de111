use serde::Serialize;

/// A bounded work session tying a user to an outlet for attendance purposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shift {
    pub id: i64,
    pub user_id: String,
    pub outlet_id: String,
    pub started_at: String,         // RFC3339
    pub ended_at: Option<String>,   // RFC3339, NULL while active
}

impl Shift {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}
