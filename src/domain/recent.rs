use std::collections::HashMap;

pub const RECENT_PROJECT_KEY: &str = "recentProjectKey";
pub const RECENT_ISSUE_TYPE_ID: &str = "recentIssueTypeId";
pub const RECENT_ASSIGNEE_ID: &str = "recentAssigneeId";
pub const RECENT_OPEN_PROJECT_KEYS: &str = "recentOpenProjectKeys";

pub const RECENT_LIST_LIMIT: usize = 20;

/// Moves every item whose key equals `recent_key` ahead of the rest, keeping
/// the original order inside both groups.
pub fn rank_by_recent_key<T, F>(mut items: Vec<T>, key_of: F, recent_key: Option<&str>) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let Some(recent_key) = recent_key.filter(|key| !key.is_empty()) else {
        return items;
    };
    items.sort_by_key(|item| key_of(item) != recent_key);
    items
}

/// Orders items by their position in `recent_keys` (most recent first).
/// Items that never appear keep their relative order after all ranked ones.
pub fn rank_by_recent_keys<T, F>(mut items: Vec<T>, key_of: F, recent_keys: &[String]) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if recent_keys.is_empty() {
        return items;
    }

    let mut rank = HashMap::with_capacity(recent_keys.len());
    for (index, key) in recent_keys.iter().enumerate() {
        rank.entry(key.as_str()).or_insert(index);
    }

    items.sort_by_key(|item| rank.get(key_of(item)).copied().unwrap_or(usize::MAX));
    items
}

/// Returns the list with `key` in front, earlier occurrences removed and the
/// tail cut at [`RECENT_LIST_LIMIT`].
pub fn remember_recent_key(recent_keys: &[String], key: &str) -> Vec<String> {
    std::iter::once(key.to_string())
        .chain(recent_keys.iter().filter(|existing| *existing != key).cloned())
        .take(RECENT_LIST_LIMIT)
        .collect()
}
