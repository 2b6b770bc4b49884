use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::info;

use crate::db::repositories::journal_repository::JournalRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::journal::{JournalAnalysisResponse, JournalEntryRecord, JournalEntryUpsert};
use crate::services::insight_cache::{semantic_key, InsightCache};
use crate::services::integrations::LlmClient;

const MAX_CONTENT_CHARS: usize = 20_000;
const DEFAULT_HISTORY_LIMIT: usize = 30;

pub struct JournalService {
    db: DbPool,
    timezone: Tz,
    llm: Option<Arc<LlmClient>>,
    insights: InsightCache,
}

impl JournalService {
    pub fn new(
        db: DbPool,
        timezone: Tz,
        llm: Option<Arc<LlmClient>>,
        insights: InsightCache,
    ) -> Self {
        Self {
            db,
            timezone,
            llm,
            insights,
        }
    }

    fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub fn upsert_entry(
        &self,
        date: Option<&str>,
        input: &JournalEntryUpsert,
    ) -> AppResult<JournalEntryRecord> {
        let entry_date = self.resolve_date(date)?;

        let content = input.content.trim();
        if content.is_empty() {
            return Err(AppError::validation("journal content must not be empty"));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(AppError::validation(format!(
                "journal content exceeds {MAX_CONTENT_CHARS} characters"
            )));
        }

        let normalized = JournalEntryUpsert {
            content: content.to_string(),
            mood: input
                .mood
                .as_deref()
                .map(str::trim)
                .filter(|mood| !mood.is_empty())
                .map(String::from),
        };

        self.db
            .with_connection(|conn| JournalRepository::upsert(conn, &entry_date, &normalized))
    }

    pub fn get_entry(&self, date: &str) -> AppResult<JournalEntryRecord> {
        let entry_date = parse_date(date)?;
        self.db
            .with_connection(|conn| JournalRepository::find_by_date(conn, &entry_date))?
            .ok_or_else(AppError::not_found)
    }

    pub fn list_entries(&self, limit: Option<usize>) -> AppResult<Vec<JournalEntryRecord>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 365);
        self.db
            .with_connection(|conn| JournalRepository::list_recent(conn, limit))
    }

    pub fn delete_entry(&self, date: &str) -> AppResult<()> {
        let entry_date = parse_date(date)?;
        self.db
            .with_connection(|conn| JournalRepository::delete(conn, &entry_date))
    }

    /// Analyze one entry's content. The cache is consulted by content hash
    /// first, so re-analyzing an unchanged entry never touches the provider.
    pub async fn analyze_entry(&self, date: &str) -> AppResult<JournalAnalysisResponse> {
        let entry = self.get_entry(date)?;

        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| AppError::not_configured("llm"))?;

        let key = semantic_key(&entry.content);
        if let Some(analysis) = self.insights.get(&key) {
            return Ok(JournalAnalysisResponse {
                entry_date: entry.entry_date,
                analysis,
                cache_hit: true,
            });
        }

        let analysis = llm.analyze_journal(&entry.content).await?;
        self.insights.put(key, analysis.clone());
        info!(target: "app::llm", entry_date = %entry.entry_date, "journal analysis cached");

        Ok(JournalAnalysisResponse {
            entry_date: entry.entry_date,
            analysis,
            cache_hit: false,
        })
    }

    fn resolve_date(&self, date: Option<&str>) -> AppResult<NaiveDate> {
        match date {
            Some(raw) => parse_date(raw),
            None => Ok(self.today()),
        }
    }
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("invalid date: {raw}, expected YYYY-MM-DD")))
}
