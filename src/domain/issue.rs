use crate::domain::user::User;

#[derive(Debug, Clone)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<User>,
    pub issue_type: IssueTypeRef,
    pub priority: Option<PriorityRef>,
    pub project: ProjectRef,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Clone)]
pub struct IssueTypeRef {
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PriorityRef {
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectRef {
    pub key: String,
    pub name: String,
}

/// Coarse grouping of workflow status names used to colour search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Done,
    InProgress,
    ToDo,
    Other,
}

impl StatusTone {
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "done" | "closed" | "resolved" => StatusTone::Done,
            "in progress" | "in review" => StatusTone::InProgress,
            "to do" | "open" | "backlog" => StatusTone::ToDo,
            _ => StatusTone::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTone::Done => "done",
            StatusTone::InProgress => "in-progress",
            StatusTone::ToDo => "to-do",
            StatusTone::Other => "other",
        }
    }
}
