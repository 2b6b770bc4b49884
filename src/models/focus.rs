use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FocusKind {
    Pomodoro,
    DeepWork,
}

impl FocusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusKind::Pomodoro => "pomodoro",
            FocusKind::DeepWork => "deep_work",
        }
    }
}

impl fmt::Display for FocusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FocusKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pomodoro" => Ok(FocusKind::Pomodoro),
            "deep_work" => Ok(FocusKind::DeepWork),
            other => Err(format!("unsupported focus kind: {other}")),
        }
    }
}

/// A finished or abandoned timer session logged from the client. The running
/// countdown lives client-side; the server only keeps the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSessionRecord {
    pub id: i64,
    pub kind: FocusKind,
    pub started_at: String,
    pub planned_minutes: i64,
    pub actual_minutes: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSessionInsert {
    pub kind: FocusKind,
    pub started_at: String,
    pub planned_minutes: i64,
    #[serde(default)]
    pub actual_minutes: i64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusDayTotals {
    pub date: String,
    pub sessions: u32,
    pub completed_sessions: u32,
    pub focus_minutes: i64,
}
