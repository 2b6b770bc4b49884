use serde::{Deserialize, Serialize};

/// A point-in-time mood sample, score 1 (worst) to 5 (best).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSampleRecord {
    pub id: i64,
    pub recorded_at: String,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSampleInsert {
    pub score: i64,
    #[serde(default)]
    pub note: Option<String>,
}
