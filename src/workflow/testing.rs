use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::board::{Board, Sprint, SprintState};
use crate::domain::issue::{Issue, IssueTypeRef, ProjectRef};
use crate::domain::project::{IssueType, IssueTypeScope, Project};
use crate::domain::ticket::{NewIssue, Ticket, TicketDraft};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::infra::jira::{browse_url, project_url};
use crate::infra::recent_store::MemoryRecentStore;
use crate::services::{IssueTrackerService, LanguageModelService};

const BASE_URL: &str = "https://team.atlassian.net";

pub fn failure(status: u16) -> AppError {
    AppError::Status {
        service: "Jira",
        status,
        body: "{\"errorMessages\":[\"nope\"]}".to_string(),
    }
}

pub fn project(key: &str, name: &str) -> Project {
    Project {
        id: format!("1{}", key.len()),
        key: key.to_string(),
        name: name.to_string(),
        project_type: Some("software".to_string()),
    }
}

pub fn issue_type(id: &str, name: &str) -> IssueType {
    IssueType {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
    }
}

pub fn user(account_id: &str, name: &str) -> User {
    User {
        account_id: account_id.to_string(),
        display_name: name.to_string(),
        avatar_url: None,
    }
}

pub fn sprint(id: u64, state: SprintState) -> Sprint {
    Sprint {
        id,
        name: format!("Sprint {id}"),
        state,
    }
}

pub fn issue(key: &str) -> Issue {
    Issue {
        key: key.to_string(),
        summary: format!("Summary of {key}"),
        status: "To Do".to_string(),
        assignee: None,
        issue_type: IssueTypeRef {
            name: "Task".to_string(),
            icon_url: None,
        },
        priority: None,
        project: ProjectRef {
            key: "ENG".to_string(),
            name: "Engineering".to_string(),
        },
        created: "2024-05-01T10:00:00.000+0000".to_string(),
        updated: "2024-05-02T10:00:00.000+0000".to_string(),
    }
}

/// In-memory tracker recording the calls workflows make.
#[derive(Default)]
pub struct FakeTracker {
    pub issues: Vec<Issue>,
    pub projects: Vec<Project>,
    pub issue_types: Vec<IssueType>,
    pub users: Vec<User>,
    pub me: Option<User>,
    pub boards: Vec<Board>,
    pub sprints: Vec<(u64, Vec<Sprint>)>,
    pub failing_board: Option<u64>,
    pub fail_users: bool,
    pub searches: Mutex<Vec<(String, usize)>>,
    pub created: Mutex<Vec<NewIssue>>,
    pub assignments: Mutex<Vec<(String, Option<String>)>>,
    pub issue_type_scopes: Mutex<Vec<IssueTypeScope>>,
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn search_issues(&self, jql: &str, limit: usize) -> AppResult<Vec<Issue>> {
        self.searches.lock().unwrap().push((jql.to_string(), limit));
        Ok(self.issues.iter().take(limit).cloned().collect())
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        Ok(self.projects.clone())
    }

    async fn list_issue_types(&self, scope: &IssueTypeScope) -> AppResult<Vec<IssueType>> {
        self.issue_type_scopes.lock().unwrap().push(scope.clone());
        Ok(self.issue_types.clone())
    }

    async fn create_issue(&self, issue: &NewIssue) -> AppResult<Ticket> {
        self.created.lock().unwrap().push(issue.clone());
        let key = format!("{}-1", issue.project_key);
        Ok(Ticket {
            url: Some(browse_url(BASE_URL, &key)),
            key,
        })
    }

    async fn list_assignable_users(&self, _project_key: &str) -> AppResult<Vec<User>> {
        if self.fail_users {
            return Err(failure(403));
        }
        Ok(self.users.clone())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn current_user(&self) -> AppResult<User> {
        self.me.clone().ok_or_else(|| failure(401))
    }

    async fn set_assignee(&self, issue_key: &str, account_id: Option<&str>) -> AppResult<()> {
        self.assignments
            .lock()
            .unwrap()
            .push((issue_key.to_string(), account_id.map(str::to_string)));
        Ok(())
    }

    async fn list_boards(&self, _project_key: &str) -> AppResult<Vec<Board>> {
        Ok(self.boards.clone())
    }

    async fn list_sprints(&self, board_id: u64, _states: &[SprintState]) -> AppResult<Vec<Sprint>> {
        if self.failing_board == Some(board_id) {
            return Err(failure(500));
        }
        Ok(self
            .sprints
            .iter()
            .find(|(id, _)| *id == board_id)
            .map(|(_, sprints)| sprints.clone())
            .unwrap_or_default())
    }

    fn issue_url(&self, issue_key: &str) -> AppResult<String> {
        Ok(browse_url(BASE_URL, issue_key))
    }

    fn project_url(&self, project_key: &str, project_type: Option<&str>) -> AppResult<String> {
        Ok(project_url(BASE_URL, project_key, project_type))
    }
}

pub struct FakeLanguageModel {
    pub answer: AppResult<TicketDraft>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLanguageModel {
    pub fn answering(summary: &str, description: &str) -> Self {
        Self {
            answer: Ok(TicketDraft {
                summary: summary.to_string(),
                description: description.to_string(),
            }),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LanguageModelService for FakeLanguageModel {
    async fn draft_ticket(&self, rough_input: &str) -> AppResult<TicketDraft> {
        self.prompts.lock().unwrap().push(rough_input.to_string());
        match &self.answer {
            Ok(draft) => Ok(draft.clone()),
            Err(_) => Err(AppError::MalformedResponse(
                "OpenAI response missing summary or description".to_string(),
            )),
        }
    }
}

pub fn context(tracker: Arc<FakeTracker>) -> AppContext {
    context_with_model(tracker, Arc::new(FakeLanguageModel::answering("S", "D")))
}

pub fn context_with_model(
    tracker: Arc<FakeTracker>,
    language_model: Arc<FakeLanguageModel>,
) -> AppContext {
    AppContext::new(
        AppConfig::default(),
        tracker,
        language_model,
        Arc::new(MemoryRecentStore::default()),
    )
}
