use clap::Args;

use crate::context::AppContext;
use crate::domain::query::{AssigneeFilter, IssueQuery, ProjectFilter};
use crate::domain::user::User;
use crate::error::AppResult;
use crate::infra::jira::DEFAULT_SEARCH_LIMIT;
use crate::workflow::search::{
    SearchFilters, SearchHit, change_assignee, search_filters, search_tickets,
};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Free text matched against ticket content.
    pub query: Vec<String>,
    /// currentUser, all, unassigned, or an account id.
    #[arg(short, long, default_value = "currentUser")]
    pub assignee: String,
    /// all, or a project key.
    #[arg(short, long, default_value = "all")]
    pub project: String,
    #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,
    /// List the members and projects accepted by --assignee and --project.
    #[arg(long)]
    pub filters: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AssignArgs {
    /// Issue key, e.g. ENG-123.
    pub issue: String,
    /// Account id of the new assignee; omit to unassign.
    pub account_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UsersArgs {
    /// Only list users assignable in this project.
    #[arg(short, long)]
    pub project: Option<String>,
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> AppResult<()> {
    if args.filters {
        let filters = search_filters(ctx).await?;
        print!("{}", format_filters(&filters));
        return Ok(());
    }

    let query = IssueQuery::new(
        args.query.join(" "),
        AssigneeFilter::from_str(&args.assignee),
        ProjectFilter::from_str(&args.project),
    );
    let hits = search_tickets(ctx, &query, args.limit).await?;

    if hits.is_empty() {
        println!("No tickets found.");
    }
    for hit in &hits {
        println!("{}", format_hit(hit));
    }
    Ok(())
}

pub async fn run_assign(ctx: &AppContext, args: AssignArgs) -> AppResult<()> {
    change_assignee(ctx, &args.issue, args.account_id.as_deref()).await?;
    match args.account_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(account_id) => println!("Assigned {} to {account_id}", args.issue.trim()),
        None => println!("Unassigned {}", args.issue.trim()),
    }
    Ok(())
}

pub async fn run_users(ctx: &AppContext, args: UsersArgs) -> AppResult<()> {
    let users = match args.project.as_deref() {
        Some(project_key) => ctx.issue_tracker.list_assignable_users(project_key).await?,
        None => ctx.issue_tracker.list_users().await?,
    };
    for user in &users {
        println!("{}", format_user(user));
    }
    Ok(())
}

fn format_hit(hit: &SearchHit) -> String {
    let issue = &hit.issue;
    let assignee = issue
        .assignee
        .as_ref()
        .map(|user| user.display_name.as_str())
        .unwrap_or("Unassigned");
    format!(
        "{key:<12} [{status}|{tone}] {project:<8} {summary} ({assignee})\n             {url}",
        key = issue.key,
        status = issue.status,
        tone = hit.tone.as_str(),
        project = issue.project.key,
        summary = issue.summary,
        url = hit.url,
    )
}

fn format_filters(filters: &SearchFilters) -> String {
    let mut out = String::from("Assignee: currentUser, all, unassigned\n");
    for member in &filters.members {
        out.push_str(&format!("  {}\n", format_user(member)));
    }
    out.push_str("Project: all\n");
    for project in &filters.projects {
        out.push_str(&format!("  {:<10} {}\n", project.key, project.name));
    }
    out
}

fn format_user(user: &User) -> String {
    format!("{:<28} {}", user.account_id, user.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::StatusTone;
    use crate::workflow::testing::{issue, project, user};

    #[test]
    fn formats_search_hit() {
        let mut found = issue("ENG-9");
        found.assignee = Some(user("acc-1", "Ada"));
        let hit = SearchHit {
            tone: StatusTone::from_status(&found.status),
            issue: found,
            url: "https://team.atlassian.net/browse/ENG-9".to_string(),
        };
        let line = format_hit(&hit);
        assert!(line.starts_with("ENG-9        [To Do|to-do] ENG      Summary of ENG-9 (Ada)"));
        assert!(line.ends_with("https://team.atlassian.net/browse/ENG-9"));
    }

    #[test]
    fn formats_filter_choices() {
        let filters = SearchFilters {
            members: vec![user("acc-1", "Ada")],
            projects: vec![project("ENG", "Engineering")],
        };
        let text = format_filters(&filters);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Assignee: currentUser, all, unassigned");
        assert!(lines[1].trim_start().starts_with("acc-1"));
        assert!(lines[1].ends_with("Ada"));
        assert_eq!(lines[2], "Project: all");
        assert_eq!(lines[3], "  ENG        Engineering");
    }
}
