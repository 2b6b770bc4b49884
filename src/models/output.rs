use serde::{Deserialize, Serialize};

/// A named output metric tracked against a daily target, e.g. "words written".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputTypeRecord {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub daily_target: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputTypeInsert {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub daily_target: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputEntryRecord {
    pub id: i64,
    pub type_id: i64,
    pub entry_date: String,
    pub count: i64,
    pub completed: bool,
    pub updated_at: String,
}

/// Upsert payload for one day's count. `date` defaults to "today" in the
/// configured reference zone when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputEntryUpsert {
    #[serde(default)]
    pub date: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputHistoryResponse {
    pub entries: Vec<OutputEntryRecord>,
    pub current_streak: u32,
    pub longest_streak: u32,
}
