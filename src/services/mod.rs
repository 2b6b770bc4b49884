pub mod insight_cache;
pub mod integrations;
pub mod journal_service;
pub mod mit_service;
pub mod output_service;
pub mod series_service;
pub mod streak_engine;
