use clap::Args;

use crate::cmd::prompt::{PromptAction, confirm, prompt};
use crate::context::AppContext;
use crate::domain::ticket::{NewIssue, Ticket};
use crate::error::{AppError, AppResult};
use crate::workflow::ticket::{TicketForm, create_ticket, draft_ticket, prepare_ticket_form};

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Rough description of the work; the language model turns it into a ticket.
    pub rough_input: Vec<String>,
    /// Project key (defaults to the last used project).
    #[arg(short, long)]
    pub project: Option<String>,
    /// Issue type id (defaults to the last used type).
    #[arg(short = 't', long)]
    pub issue_type: Option<String>,
    /// Assignee account id; '-' leaves the ticket unassigned.
    #[arg(short, long)]
    pub assignee: Option<String>,
    /// Sprint id; 0 keeps the ticket out of any sprint.
    #[arg(short, long)]
    pub sprint: Option<u64>,
    /// Create without asking for confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(ctx: &AppContext, args: CreateArgs) -> AppResult<Ticket> {
    let form = prepare_ticket_form(ctx, args.project.as_deref()).await?;
    let project_key = form.project_key.clone().ok_or_else(|| {
        AppError::Precondition("no project selected; pass --project".to_string())
    })?;

    let rough_input = args.rough_input.join(" ");
    println!("Generating ticket...");
    let draft = draft_ticket(ctx, &rough_input).await?;

    let mut issue = NewIssue {
        project_key,
        issue_type_id: args
            .issue_type
            .clone()
            .or_else(|| form.issue_type_id.clone())
            .unwrap_or_default(),
        summary: draft.summary,
        description: Some(draft.description),
        assignee_account_id: resolve_assignee(args.assignee.as_deref(), &form),
        sprint_id: match args.sprint {
            Some(0) => None,
            Some(id) => Some(id),
            None => form.sprint_id,
        },
    };

    print_preview(&issue, &form);

    if !args.yes {
        edit_field("Summary", &mut issue.summary)?;
        let mut description = issue.description.take().unwrap_or_default();
        edit_field("Description", &mut description)?;
        issue.description = Some(description).filter(|text| !text.is_empty());

        if !confirm("Create this ticket?")? {
            return Err(AppError::Precondition("ticket creation cancelled".to_string()));
        }
    }

    create_ticket(ctx, issue).await
}

fn resolve_assignee(requested: Option<&str>, form: &TicketForm) -> Option<String> {
    match requested.map(str::trim) {
        Some("-") => None,
        Some(account_id) if !account_id.is_empty() => Some(account_id.to_string()),
        _ => form.assignee_account_id.clone(),
    }
}

fn edit_field(field: &str, value: &mut String) -> AppResult<()> {
    match prompt(field, Some(value.as_str()), false)? {
        PromptAction::Keep => {}
        PromptAction::Clear => value.clear(),
        PromptAction::Set(updated) => *value = updated,
    }
    Ok(())
}

fn print_preview(issue: &NewIssue, form: &TicketForm) {
    let issue_type = form
        .issue_types
        .iter()
        .find(|issue_type| issue_type.id == issue.issue_type_id)
        .map(|issue_type| issue_type.name.as_str())
        .unwrap_or(issue.issue_type_id.as_str());
    let assignee = issue
        .assignee_account_id
        .as_deref()
        .map(|account_id| {
            form.assignees
                .iter()
                .find(|user| user.account_id == account_id)
                .map(|user| user.display_name.as_str())
                .unwrap_or(account_id)
        })
        .unwrap_or("Unassigned");
    let sprint = issue
        .sprint_id
        .and_then(|id| form.sprints.iter().find(|sprint| sprint.id == id))
        .map(|sprint| format!("{} ({})", sprint.name, sprint.state.as_str()))
        .unwrap_or_else(|| "None".to_string());

    println!();
    println!("Project:     {}", issue.project_key);
    println!("Issue type:  {issue_type}");
    println!("Assignee:    {assignee}");
    println!("Sprint:      {sprint}");
    println!("Summary:     {}", issue.summary);
    println!("Description:\n{}", issue.description.as_deref().unwrap_or(""));
    println!();
}
