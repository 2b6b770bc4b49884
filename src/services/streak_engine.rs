//! Streak and date-bucketed statistics over a series of daily records.
//!
//! Pure and synchronous: callers fetch the rows, this module only aggregates.
//! A missing date and an explicitly incomplete record are equivalent for
//! contiguity purposes (intentional product behavior, kept as-is).

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, NaiveDate};
use tracing::warn;

use crate::models::streak::{DailyRecord, DayStatus, Granularity, PeriodStats, Streaks, StreakSummary};

pub const ROLLING_WINDOW_DAYS: usize = 30;

/// Convert raw `(date, completed)` pairs as stored into engine records.
/// Rows with unparseable dates are skipped with a warning rather than
/// aborting the aggregation; one corrupt row must not take streak
/// reporting down with it.
pub fn parse_records(raw: &[(String, bool)]) -> Vec<DailyRecord> {
    raw.iter()
        .filter_map(|(date, completed)| {
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(date) => Some(DailyRecord {
                    date,
                    completed: *completed,
                }),
                Err(err) => {
                    warn!(
                        target: "app::streak",
                        value = %date,
                        error = %err,
                        "skipping record with malformed date"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Current streak (consecutive completed dates ending at `today`, inclusive)
/// and longest completed run anywhere in history.
pub fn compute_streaks(records: &[DailyRecord], today: NaiveDate) -> Streaks {
    let mut completed: Vec<NaiveDate> = records
        .iter()
        .filter(|record| record.completed)
        .map(|record| record.date)
        .collect();
    completed.sort();
    completed.dedup();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for date in &completed {
        run = match prev {
            Some(prev_date) if (*date - prev_date).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*date);
    }

    // Walk backward from today; the first missing or incomplete date ends
    // the current streak. An incomplete record for today therefore yields 0
    // without disturbing the longest-run scan above.
    let completed_set: std::collections::HashSet<NaiveDate> = completed.into_iter().collect();
    let mut current = 0u32;
    let mut cursor = today;
    while completed_set.contains(&cursor) {
        current += 1;
        cursor = match cursor.pred_opt() {
            Some(date) => date,
            None => break,
        };
    }

    Streaks {
        current_streak: current,
        longest_streak: longest,
    }
}

/// Fixed-size window of per-day status ending at `reference`, ascending.
/// A left join between the date range and the sparse record set: dates
/// with no record appear as `{completed: null, has_task: false}`.
pub fn build_rolling_window(
    records: &[DailyRecord],
    window_days: usize,
    reference: NaiveDate,
) -> Vec<DayStatus> {
    let by_date: HashMap<NaiveDate, bool> = records
        .iter()
        .map(|record| (record.date, record.completed))
        .collect();

    let start = reference
        .checked_sub_days(Days::new(window_days.saturating_sub(1) as u64))
        .unwrap_or(reference);

    let mut window = Vec::with_capacity(window_days);
    let mut cursor = start;
    for _ in 0..window_days {
        match by_date.get(&cursor) {
            Some(completed) => window.push(DayStatus {
                date: cursor,
                completed: Some(*completed),
                has_task: true,
            }),
            None => window.push(DayStatus {
                date: cursor,
                completed: None,
                has_task: false,
            }),
        }
        cursor = match cursor.succ_opt() {
            Some(date) => date,
            None => break,
        };
    }

    window
}

/// Completion-rate buckets by ISO week or calendar month, most recent first.
/// Buckets only exist where records exist, so `total` is never zero.
pub fn group_by_period(records: &[DailyRecord], granularity: Granularity) -> Vec<PeriodStats> {
    let mut buckets: BTreeMap<(i32, u32), (String, u32, u32)> = BTreeMap::new();

    for record in records {
        let (sort_key, label) = match granularity {
            Granularity::Week => {
                let week = record.date.iso_week();
                (
                    (week.year(), week.week()),
                    format!("{}-W{:02}", week.year(), week.week()),
                )
            }
            Granularity::Month => (
                (record.date.year(), record.date.month()),
                format!("{}-{:02}", record.date.year(), record.date.month()),
            ),
        };

        let bucket = buckets.entry(sort_key).or_insert((label, 0, 0));
        bucket.1 += 1;
        if record.completed {
            bucket.2 += 1;
        }
    }

    buckets
        .into_values()
        .rev()
        .map(|(period, total, completed)| PeriodStats {
            period,
            total,
            completed,
            completion_rate: round_rate(completed, total),
        })
        .collect()
}

/// Full per-request summary for one series.
pub fn summarize(records: &[DailyRecord], today: NaiveDate) -> StreakSummary {
    let streaks = compute_streaks(records, today);

    StreakSummary {
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
        last_30_days: build_rolling_window(records, ROLLING_WINDOW_DAYS, today),
        weekly_stats: group_by_period(records, Granularity::Week),
        monthly_stats: group_by_period(records, Granularity::Month),
    }
}

fn round_rate(completed: u32, total: u32) -> f64 {
    debug_assert!(total > 0, "zero-total buckets are never emitted");
    (completed as f64 / total as f64 * 1000.0).round() / 10.0
}
