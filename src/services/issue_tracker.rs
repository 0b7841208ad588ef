use async_trait::async_trait;

use crate::domain::board::{Board, Sprint, SprintState};
use crate::domain::issue::Issue;
use crate::domain::project::{IssueType, IssueTypeScope, Project};
use crate::domain::ticket::{NewIssue, Ticket};
use crate::domain::user::User;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn search_issues(&self, jql: &str, limit: usize) -> AppResult<Vec<Issue>>;
    async fn list_projects(&self) -> AppResult<Vec<Project>>;
    async fn list_issue_types(&self, scope: &IssueTypeScope) -> AppResult<Vec<IssueType>>;
    async fn create_issue(&self, issue: &NewIssue) -> AppResult<Ticket>;
    async fn list_assignable_users(&self, project_key: &str) -> AppResult<Vec<User>>;
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn current_user(&self) -> AppResult<User>;
    async fn set_assignee(&self, issue_key: &str, account_id: Option<&str>) -> AppResult<()>;
    async fn list_boards(&self, project_key: &str) -> AppResult<Vec<Board>>;
    async fn list_sprints(&self, board_id: u64, states: &[SprintState]) -> AppResult<Vec<Sprint>>;

    fn issue_url(&self, issue_key: &str) -> AppResult<String>;
    fn project_url(&self, project_key: &str, project_type: Option<&str>) -> AppResult<String>;
}
