pub mod focus_repository;
pub mod journal_repository;
pub mod mit_repository;
pub mod mood_repository;
pub mod note_repository;
pub mod output_repository;
pub mod reminder_repository;
pub mod snippet_repository;
