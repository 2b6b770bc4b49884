use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryRecord {
    pub id: i64,
    pub entry_date: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryUpsert {
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
}

/// Structured LLM analysis of one journal entry. Shape is enforced by the
/// chat client requesting a JSON object and repairing fenced output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalAnalysis {
    pub summary: String,
    pub sentiment: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalAnalysisResponse {
    pub entry_date: String,
    pub analysis: JournalAnalysis,
    pub cache_hit: bool,
}
