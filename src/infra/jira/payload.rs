use serde::{Deserialize, Serialize};

use crate::domain::board::{Board, Sprint, SprintState};
use crate::domain::issue::{Issue, IssueTypeRef, PriorityRef, ProjectRef};
use crate::domain::project::{IssueType, Project};
use crate::domain::ticket::NewIssue;
use crate::domain::user::User;

#[derive(Serialize)]
pub(crate) struct JiraCreateIssueRequest {
    fields: JiraCreateIssueFields,
}

impl JiraCreateIssueRequest {
    pub(crate) fn new(issue: &NewIssue) -> Self {
        let description = issue
            .description
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(JiraDescription::from_text);
        let assignee = issue
            .assignee_account_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| JiraAccountRef {
                account_id: id.to_string(),
            });

        Self {
            fields: JiraCreateIssueFields {
                project: JiraProjectKey {
                    key: issue.project_key.clone(),
                },
                issuetype: JiraIssueTypeId {
                    id: issue.issue_type_id.clone(),
                },
                summary: issue.summary.clone(),
                description,
                assignee,
                sprint: issue.sprint_id.map(|id| JiraSprintId { id }),
            },
        }
    }
}

#[derive(Serialize)]
struct JiraCreateIssueFields {
    project: JiraProjectKey,
    issuetype: JiraIssueTypeId,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<JiraDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<JiraAccountRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sprint: Option<JiraSprintId>,
}

#[derive(Serialize)]
struct JiraProjectKey {
    key: String,
}

#[derive(Serialize)]
struct JiraIssueTypeId {
    id: String,
}

#[derive(Serialize)]
struct JiraAccountRef {
    #[serde(rename = "accountId")]
    account_id: String,
}

#[derive(Serialize)]
struct JiraSprintId {
    id: u64,
}

/// Atlassian document holding the description as one paragraph.
#[derive(Serialize)]
struct JiraDescription {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<JiraDocNode>,
}

impl JiraDescription {
    fn from_text(text: &str) -> Self {
        Self {
            doc_type: "doc",
            version: 1,
            content: vec![JiraDocNode::paragraph(text.to_string())],
        }
    }
}

#[derive(Serialize)]
struct JiraDocNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<JiraDocText>,
}

impl JiraDocNode {
    fn paragraph(text: String) -> Self {
        Self {
            node_type: "paragraph",
            content: vec![JiraDocText::text(text)],
        }
    }
}

#[derive(Serialize)]
struct JiraDocText {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl JiraDocText {
    fn text(text: String) -> Self {
        Self {
            text_type: "text",
            text,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct JiraCreateIssueResponse {
    pub(crate) key: String,
}

#[derive(Serialize)]
pub(crate) struct JiraAssigneeRequest<'a> {
    #[serde(rename = "accountId")]
    pub(crate) account_id: Option<&'a str>,
}

#[derive(Deserialize)]
pub(crate) struct JiraSearchResponse {
    #[serde(default)]
    pub(crate) issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
pub(crate) struct JiraIssue {
    key: String,
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    summary: String,
    status: JiraNamed,
    assignee: Option<JiraUser>,
    issuetype: JiraIconNamed,
    priority: Option<JiraIconNamed>,
    project: JiraProjectRef,
    created: String,
    updated: String,
}

#[derive(Deserialize)]
struct JiraNamed {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraIconNamed {
    name: String,
    icon_url: Option<String>,
}

#[derive(Deserialize)]
struct JiraProjectRef {
    key: String,
    name: String,
}

impl From<JiraIssue> for Issue {
    fn from(issue: JiraIssue) -> Self {
        let fields = issue.fields;
        Issue {
            key: issue.key,
            summary: fields.summary,
            status: fields.status.name,
            assignee: fields.assignee.map(User::from),
            issue_type: IssueTypeRef {
                name: fields.issuetype.name,
                icon_url: fields.issuetype.icon_url,
            },
            priority: fields.priority.map(|priority| PriorityRef {
                name: priority.name,
                icon_url: priority.icon_url,
            }),
            project: ProjectRef {
                key: fields.project.key,
                name: fields.project.name,
            },
            created: fields.created,
            updated: fields.updated,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraUser {
    account_id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    avatar_urls: JiraAvatarUrls,
}

#[derive(Deserialize, Default)]
struct JiraAvatarUrls {
    #[serde(rename = "48x48")]
    large: Option<String>,
}

impl From<JiraUser> for User {
    fn from(user: JiraUser) -> Self {
        User {
            account_id: user.account_id,
            display_name: user.display_name,
            avatar_url: user.avatar_urls.large,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraProjectPage {
    #[serde(default)]
    pub(crate) values: Vec<JiraProject>,
    #[serde(default = "last_page")]
    pub(crate) is_last: bool,
}

fn last_page() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraProject {
    id: String,
    key: String,
    name: String,
    project_type_key: Option<String>,
}

impl From<JiraProject> for Project {
    fn from(project: JiraProject) -> Self {
        Project {
            id: project.id,
            key: project.key,
            name: project.name,
            project_type: project.project_type_key,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct JiraIssueType {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<JiraIssueType> for IssueType {
    fn from(issue_type: JiraIssueType) -> Self {
        IssueType {
            id: issue_type.id,
            name: issue_type.name,
            description: issue_type.description.unwrap_or_default(),
        }
    }
}

/// The issue-type endpoints answer with different shapes depending on
/// whether the project is addressed by id or by key.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum IssueTypeEnvelope {
    Listed(Vec<JiraIssueType>),
    IssueTypes {
        #[serde(rename = "issueTypes")]
        issue_types: Vec<JiraIssueType>,
    },
    Values {
        values: Vec<JiraIssueType>,
    },
    Empty {},
}

impl IssueTypeEnvelope {
    pub(crate) fn into_issue_types(self) -> Vec<IssueType> {
        let raw = match self {
            IssueTypeEnvelope::Listed(types)
            | IssueTypeEnvelope::IssueTypes { issue_types: types }
            | IssueTypeEnvelope::Values { values: types } => types,
            IssueTypeEnvelope::Empty {} => Vec::new(),
        };
        raw.into_iter().map(IssueType::from).collect()
    }
}

#[derive(Deserialize)]
pub(crate) struct JiraValues<T> {
    #[serde(default = "Vec::new")]
    pub(crate) values: Vec<T>,
}

#[derive(Deserialize)]
pub(crate) struct JiraBoard {
    id: u64,
    name: String,
}

impl From<JiraBoard> for Board {
    fn from(board: JiraBoard) -> Self {
        Board {
            id: board.id,
            name: board.name,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct JiraSprint {
    id: u64,
    name: String,
    state: String,
}

impl From<JiraSprint> for Sprint {
    fn from(sprint: JiraSprint) -> Self {
        Sprint {
            id: sprint.id,
            name: sprint.name,
            state: SprintState::from_str(&sprint.state),
        }
    }
}
