pub mod jira;
pub mod llm;
pub mod recent_store;
