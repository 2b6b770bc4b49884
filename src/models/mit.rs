use serde::{Deserialize, Serialize};

/// The Most-Important-Task for one calendar date. At most one per date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitTaskRecord {
    pub id: i64,
    pub task_date: String,
    pub task_text: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitTaskUpsert {
    pub task_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitHistoryResponse {
    pub tasks: Vec<MitTaskRecord>,
    pub current_streak: u32,
    pub longest_streak: u32,
}
