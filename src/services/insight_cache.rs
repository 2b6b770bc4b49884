use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use lru::LruCache;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::journal::JournalAnalysis;

/// Cache key for one analysis: base64url-encoded SHA-256 over the entry
/// content, so edits invalidate naturally.
pub fn semantic_key(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"journal-analysis:");
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    URL_SAFE_NO_PAD.encode(digest)
}

struct CachedInsight {
    analysis: JournalAnalysis,
    cached_at: Instant,
}

/// Bounded LRU of journal analyses with a TTL. Both bounds are injected by
/// whichever service owns the cache; there is no ambient global instance.
pub struct InsightCache {
    entries: Mutex<LruCache<String, CachedInsight>>,
    ttl: Duration,
}

impl InsightCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<JournalAnalysis> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(cached) if cached.cached_at.elapsed() <= self.ttl => {
                debug!(target: "app::llm::cache", %key, "insight cache hit");
                Some(cached.analysis.clone())
            }
            Some(_) => {
                debug!(target: "app::llm::cache", %key, "insight cache entry expired");
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, analysis: JournalAnalysis) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(
                key,
                CachedInsight {
                    analysis,
                    cached_at: Instant::now(),
                },
            );
        }
    }
}
