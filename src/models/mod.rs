pub mod focus;
pub mod integrations;
pub mod journal;
pub mod mit;
pub mod mood;
pub mod note;
pub mod output;
pub mod reminder;
pub mod snippet;
pub mod streak;
