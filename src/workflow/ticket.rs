use futures_util::future::{join3, try_join_all};

use crate::context::AppContext;
use crate::domain::board::{Sprint, SprintState, default_sprint};
use crate::domain::project::{IssueType, IssueTypeScope, Project};
use crate::domain::recent::{
    RECENT_ASSIGNEE_ID, RECENT_ISSUE_TYPE_ID, RECENT_PROJECT_KEY, rank_by_recent_key,
};
use crate::domain::ticket::{NewIssue, Ticket, TicketDraft};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};

/// Options and preselected values for a new ticket in one project.
#[derive(Debug, Clone, Default)]
pub struct TicketForm {
    pub projects: Vec<Project>,
    pub project_key: Option<String>,
    pub issue_types: Vec<IssueType>,
    pub issue_type_id: Option<String>,
    pub assignees: Vec<User>,
    pub assignee_account_id: Option<String>,
    pub sprints: Vec<Sprint>,
    pub sprint_id: Option<u64>,
}

pub async fn draft_ticket(ctx: &AppContext, rough_input: &str) -> AppResult<TicketDraft> {
    if rough_input.trim().is_empty() {
        return Err(AppError::Precondition(
            "describe the ticket before generating it".to_string(),
        ));
    }
    ctx.language_model.draft_ticket(rough_input).await
}

/// Loads everything needed to fill in a ticket, ranking each list by the
/// selection remembered from the previous ticket.
pub async fn prepare_ticket_form(
    ctx: &AppContext,
    project_override: Option<&str>,
) -> AppResult<TicketForm> {
    let recent_project = ctx.recent.get(RECENT_PROJECT_KEY);
    let recent_issue_type = ctx.recent.get(RECENT_ISSUE_TYPE_ID);
    let recent_assignee = ctx.recent.get(RECENT_ASSIGNEE_ID);

    let projects = rank_by_recent_key(
        ctx.issue_tracker.list_projects().await?,
        |project| project.key.as_str(),
        recent_project.as_deref(),
    );

    let project_key = project_override
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or(recent_project);

    let Some(project_key) = project_key else {
        return Ok(TicketForm {
            projects,
            ..TicketForm::default()
        });
    };

    let scope = IssueTypeScope::detect(&project_key);
    let (issue_types, assignees, sprints) = join3(
        ctx.issue_tracker.list_issue_types(&scope),
        ctx.issue_tracker.list_assignable_users(&project_key),
        sprints_for_project(ctx, &project_key),
    )
    .await;

    let issue_types = rank_by_recent_key(
        issue_types?,
        |issue_type| issue_type.id.as_str(),
        recent_issue_type.as_deref(),
    );
    let assignees = rank_by_recent_key(
        assignees?,
        |user| user.account_id.as_str(),
        recent_assignee.as_deref(),
    );

    let issue_type_id = issue_types.first().map(|issue_type| issue_type.id.clone());
    let assignee_account_id = match recent_assignee {
        Some(account_id) => Some(account_id),
        None => match ctx.issue_tracker.current_user().await {
            Ok(me) => Some(me.account_id),
            Err(err) => {
                tracing::debug!("current user unavailable, leaving ticket unassigned: {err}");
                None
            }
        },
    };
    let sprint_id = default_sprint(&sprints).map(|sprint| sprint.id);

    Ok(TicketForm {
        projects,
        project_key: Some(project_key),
        issue_types,
        issue_type_id,
        assignees,
        assignee_account_id,
        sprints,
        sprint_id,
    })
}

/// Active and future sprints across every board of the project. Any failed
/// lookup yields an empty list instead of an error.
pub async fn sprints_for_project(ctx: &AppContext, project_key: &str) -> Vec<Sprint> {
    let boards = match ctx.issue_tracker.list_boards(project_key).await {
        Ok(boards) => boards,
        Err(err) => {
            tracing::warn!(project_key, "failed to load boards: {err}");
            return Vec::new();
        }
    };

    let states = [SprintState::Active, SprintState::Future];
    let lookups = boards
        .iter()
        .map(|board| ctx.issue_tracker.list_sprints(board.id, &states));
    match try_join_all(lookups).await {
        Ok(per_board) => per_board.into_iter().flatten().collect(),
        Err(err) => {
            tracing::warn!(project_key, "failed to load sprints: {err}");
            Vec::new()
        }
    }
}

pub async fn create_ticket(ctx: &AppContext, issue: NewIssue) -> AppResult<Ticket> {
    if issue.summary.trim().is_empty() {
        return Err(AppError::Precondition("summary is required".to_string()));
    }
    if issue.project_key.trim().is_empty() {
        return Err(AppError::Precondition("project is required".to_string()));
    }
    if issue.issue_type_id.trim().is_empty() {
        return Err(AppError::Precondition("issue type is required".to_string()));
    }

    let ticket = ctx.issue_tracker.create_issue(&issue).await?;
    tracing::info!(key = %ticket.key, "created ticket");

    let mut remembered = vec![
        (RECENT_PROJECT_KEY, issue.project_key.as_str()),
        (RECENT_ISSUE_TYPE_ID, issue.issue_type_id.as_str()),
    ];
    if let Some(account_id) = issue.assignee_account_id.as_deref().filter(|id| !id.is_empty()) {
        remembered.push((RECENT_ASSIGNEE_ID, account_id));
    }
    for (key, value) in remembered {
        if let Err(err) = ctx.recent.set(key, value) {
            tracing::warn!(key, "failed to remember selection: {err}");
        }
    }

    Ok(ticket)
}
