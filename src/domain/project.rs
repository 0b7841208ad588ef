#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,
    pub project_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueType {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// How a project is addressed when looking up its issue types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueTypeScope {
    ProjectId(String),
    ProjectKey(String),
}

impl IssueTypeScope {
    /// Numeric identifiers address a project by id, anything else by key.
    pub fn detect(id_or_key: &str) -> Self {
        let trimmed = id_or_key.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            IssueTypeScope::ProjectId(trimmed.to_string())
        } else {
            IssueTypeScope::ProjectKey(trimmed.to_string())
        }
    }
}
