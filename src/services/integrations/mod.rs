use std::sync::Mutex;
use std::time::{Duration, Instant};

pub mod llm;
pub mod news;
pub mod quotes;
pub mod weather;

pub use llm::LlmClient;
pub use news::NewsService;
pub use quotes::QuoteService;
pub use weather::WeatherService;

/// Single-slot cache with a fixed TTL. Dashboard adapters hold one each so a
/// page refresh never re-fetches an upstream inside the freshness window.
/// The lock is only held for the copy in and out, never across a request.
pub(crate) struct TtlSlot<T: Clone> {
    slot: Mutex<Option<(Instant, T)>>,
    ttl: Duration,
}

impl<T: Clone> TtlSlot<T> {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    pub(crate) fn get(&self) -> Option<T> {
        let mut guard = self.slot.lock().ok()?;
        match guard.as_ref() {
            Some((stamped, value)) if stamped.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                *guard = None;
                None
            }
            None => None,
        }
    }

    pub(crate) fn put(&self, value: T) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = Some((Instant::now(), value));
        }
    }
}
