pub mod issue_tracker;
pub mod language_model;
pub mod recent_store;

pub use issue_tracker::IssueTrackerService;
pub use language_model::LanguageModelService;
pub use recent_store::RecentStore;
