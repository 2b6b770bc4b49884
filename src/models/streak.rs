use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar date of a tracked series, as the engine consumes it.
///
/// `completed` is stamped at write time by whichever domain rule applies
/// (MIT marked done, output count reached its target). The engine only
/// aggregates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Bucket width for period statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Week,
    Month,
}

/// One slot of the rolling heatmap window. Dates with no underlying record
/// are present with `completed: null` and `has_task: false`, never skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub completed: Option<bool>,
    pub has_task: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodStats {
    pub period: String,
    pub total: u32,
    pub completed: u32,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Streaks {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Derived per request from the current record set; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_30_days: Vec<DayStatus>,
    pub weekly_stats: Vec<PeriodStats>,
    pub monthly_stats: Vec<PeriodStats>,
}

/// A series record as exposed by the generic history endpoint. `value`
/// carries the series-specific payload: MIT task text, output count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRecordView {
    pub date: String,
    pub completed: bool,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesHistoryResponse {
    pub series: String,
    pub records: Vec<SeriesRecordView>,
    pub current_streak: u32,
    pub longest_streak: u32,
}
