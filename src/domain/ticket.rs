/// Ticket content drafted by the language model, reviewed before creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub summary: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub project_key: String,
    pub issue_type_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub assignee_account_id: Option<String>,
    pub sprint_id: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub key: String,
    pub url: Option<String>,
}
