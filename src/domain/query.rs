const SORT_CLAUSE: &str = "ORDER BY updated DESC";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssigneeFilter {
    #[default]
    CurrentUser,
    All,
    Unassigned,
    Account(String),
}

impl AssigneeFilter {
    pub fn from_str(value: &str) -> Self {
        match value.trim() {
            "currentUser" | "me" => AssigneeFilter::CurrentUser,
            "all" => AssigneeFilter::All,
            "unassigned" => AssigneeFilter::Unassigned,
            other => AssigneeFilter::Account(other.to_string()),
        }
    }

    fn condition(&self) -> Option<String> {
        match self {
            AssigneeFilter::CurrentUser => Some("assignee = currentUser()".to_string()),
            AssigneeFilter::Unassigned => Some("assignee is EMPTY".to_string()),
            AssigneeFilter::Account(account_id) => {
                Some(format!("assignee = {}", quote(account_id)))
            }
            AssigneeFilter::All => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectFilter {
    #[default]
    All,
    Key(String),
}

impl ProjectFilter {
    pub fn from_str(value: &str) -> Self {
        match value.trim() {
            "all" | "" => ProjectFilter::All,
            key => ProjectFilter::Key(key.to_string()),
        }
    }

    fn condition(&self) -> Option<String> {
        match self {
            ProjectFilter::All => None,
            ProjectFilter::Key(key) => Some(format!("project = {key}")),
        }
    }
}

/// Inputs of the ticket search screen, rendered as a single JQL string.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    pub text: String,
    pub assignee: AssigneeFilter,
    pub project: ProjectFilter,
}

impl IssueQuery {
    pub fn new(text: impl Into<String>, assignee: AssigneeFilter, project: ProjectFilter) -> Self {
        Self {
            text: text.into(),
            assignee,
            project,
        }
    }

    pub fn to_jql(&self) -> String {
        let text = self.text.trim();
        let text_condition = (!text.is_empty()).then(|| format!("text ~ {}", quote(text)));

        let conditions = [
            text_condition,
            self.assignee.condition(),
            self.project.condition(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        if conditions.is_empty() {
            SORT_CLAUSE.to_string()
        } else {
            format!("{} {SORT_CLAUSE}", conditions.join(" AND "))
        }
    }
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
