use crate::error::AppResult;

/// Small string key-value storage for "last used" selections.
pub trait RecentStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}
