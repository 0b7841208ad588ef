use crate::context::AppContext;
use crate::domain::issue::{Issue, StatusTone};
use crate::domain::project::Project;
use crate::domain::query::IssueQuery;
use crate::domain::user::User;
use crate::error::{AppError, AppResult};

pub struct SearchHit {
    pub issue: Issue,
    pub tone: StatusTone,
    pub url: String,
}

/// Choices offered by the search filter: members and projects.
pub struct SearchFilters {
    pub members: Vec<User>,
    pub projects: Vec<Project>,
}

pub async fn search_tickets(
    ctx: &AppContext,
    query: &IssueQuery,
    limit: usize,
) -> AppResult<Vec<SearchHit>> {
    let jql = query.to_jql();
    tracing::debug!(%jql, limit, "searching issues");

    let issues = ctx.issue_tracker.search_issues(&jql, limit).await?;
    issues
        .into_iter()
        .map(|issue| -> AppResult<SearchHit> {
            let url = ctx.issue_tracker.issue_url(&issue.key)?;
            Ok(SearchHit {
                tone: StatusTone::from_status(&issue.status),
                issue,
                url,
            })
        })
        .collect()
}

pub async fn search_filters(ctx: &AppContext) -> AppResult<SearchFilters> {
    let (members, projects) = futures_util::future::try_join(
        ctx.issue_tracker.list_users(),
        ctx.issue_tracker.list_projects(),
    )
    .await?;
    Ok(SearchFilters { members, projects })
}

/// Reassigns an issue; `None` clears the assignee.
pub async fn change_assignee(
    ctx: &AppContext,
    issue_key: &str,
    account_id: Option<&str>,
) -> AppResult<()> {
    let issue_key = issue_key.trim();
    if issue_key.is_empty() {
        return Err(AppError::Precondition("issue key is required".to_string()));
    }
    let account_id = account_id.map(str::trim).filter(|id| !id.is_empty());
    ctx.issue_tracker.set_assignee(issue_key, account_id).await
}
