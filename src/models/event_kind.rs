use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EventKind {
    CheckIn,
    CheckOut,
}

impl EventKind {
    pub fn ek_from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in" | "checkin" | "check-in" => Some(Self::CheckIn),
            "out" | "checkout" | "check-out" => Some(Self::CheckOut),
            _ => None,
        }
    }

    pub fn ek_as_str(&self) -> &'static str {
        match self {
            EventKind::CheckIn => "check-in",
            EventKind::CheckOut => "check-out",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventKind::CheckIn => "in",
            EventKind::CheckOut => "out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(EventKind::CheckIn),
            "out" => Some(EventKind::CheckOut),
            _ => None,
        }
    }

    pub fn is_check_in(&self) -> bool {
        matches!(self, EventKind::CheckIn)
    }
}
